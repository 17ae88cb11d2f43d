//! One on-disk INI document: parsing, serialization and the store policy.

use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::error::{Error, ParseError, Result};
use crate::io::FileIo;
use crate::parse::{self, Line};
use crate::section::Section;

/// Top-level item of a file: raw text before the first header, or a section.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
  Raw(String),
  Section(Section),
}

/// An INI document bound to one path.
///
/// Top-level items are kept in their original top-to-bottom order and
/// serialization replays that order, so unmutated input round-trips intact.
/// Section names are unique within one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalFile {
  path: PathBuf,
  contents: Vec<Content>,
  destroy_empty: bool,
}

impl PhysicalFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      contents: Vec::new(),
      destroy_empty: false,
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// When enabled, a store pass deletes the file instead of rewriting it
  /// once no live sections remain.
  pub fn set_destroy_empty(&mut self, destroy_empty: bool) {
    self.destroy_empty = destroy_empty;
  }

  /// Reads and parses the backing file through the I/O collaborator.
  pub fn read<S: FileIo>(&mut self, io: &S) -> Result<()> {
    let Some(text) = io.read(&self.path)? else {
      return Err(Error::NotFound {
        path: self.path.clone(),
      });
    };
    self.parse(&text)?;
    Ok(())
  }

  /// Parses `text` into the document model.
  ///
  /// All-or-nothing: the first grammar violation aborts the whole read.
  /// Sections built here are marked clean once fully consumed, so that
  /// parsing-time inserts never surface as caller mutations.
  pub fn parse(&mut self, text: &str) -> std::result::Result<(), ParseError> {
    #[cfg(feature = "tracing")]
    debug!("parsing {} ({} bytes)", self.path.display(), text.len());

    let mut current: Option<Section> = None;
    let mut last_key: Option<String> = None;

    for (index, raw) in text.split_inclusive('\n').enumerate() {
      let number = index + 1;
      let continuation_open = current.is_some() && last_key.is_some();

      match parse::classify(raw, continuation_open) {
        Line::Blank | Line::Comment => match &mut current {
          Some(section) => section.add_raw_line(raw),
          None => self.contents.push(Content::Raw(raw.to_owned())),
        },
        Line::Continuation(extra) => {
          if let (Some(section), Some(key)) = (&mut current, last_key.as_deref()) {
            #[cfg(feature = "tracing")]
            trace!("line {number}: continuation of {key:?}");
            let joined = match section.get(key) {
              Some(value) => format!("{value}\n{extra}"),
              None => extra.to_owned(),
            };
            section.set(key, joined);
          }
        }
        Line::SectionHeader(name) => {
          #[cfg(feature = "tracing")]
          trace!("line {number}: section [{name}]");
          if let Some(mut done) = current.take() {
            done.mark_clean();
            self.contents.push(Content::Section(done));
          }
          if self.get_section(name).is_some() {
            return Err(ParseError::DuplicateSection {
              path: self.path.clone(),
              line: number,
              name: name.to_owned(),
            });
          }
          current = Some(Section::new(name));
          last_key = None;
        }
        Line::Property { key, value } => match &mut current {
          Some(section) => {
            section.set(key, value);
            last_key = Some(key.to_owned());
          }
          None => {
            return Err(ParseError::PropertyOutsideSection {
              path: self.path.clone(),
              line: number,
              key: key.to_owned(),
            });
          }
        },
        Line::Invalid => {
          return Err(ParseError::InvalidLine {
            path: self.path.clone(),
            line: number,
            text: raw.trim_end().to_owned(),
          });
        }
      }
    }

    if let Some(mut done) = current.take() {
      done.mark_clean();
      self.contents.push(Content::Section(done));
    }
    Ok(())
  }

  /// Returns the section named `name`, if this file defines it.
  pub fn get_section(&self, name: &str) -> Option<&Section> {
    self.contents.iter().find_map(|content| match content {
      Content::Section(section) if section.name() == name => Some(section),
      _ => None,
    })
  }

  pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
    self.contents.iter_mut().find_map(|content| match content {
      Content::Section(section) if section.name() == name => Some(section),
      _ => None,
    })
  }

  /// Creates a new empty section at the end of the file.
  pub fn add_section(&mut self, name: &str) -> Result<&mut Section> {
    if self.get_section(name).is_some() {
      return Err(
        ParseError::SectionExists {
          path: self.path.clone(),
          name: name.to_owned(),
        }
        .into(),
      );
    }
    self.contents.push(Content::Section(Section::new(name)));
    let Some(Content::Section(section)) = self.contents.last_mut() else {
      unreachable!("a section was just pushed");
    };
    Ok(section)
  }

  /// All sections in file order.
  pub fn sections(&self) -> impl Iterator<Item = &Section> {
    self.contents.iter().filter_map(|content| match content {
      Content::Section(section) => Some(section),
      _ => None,
    })
  }

  /// Writes, deletes or leaves the backing file alone depending on the
  /// accumulated dirty and destroy state, then clears that state.
  ///
  /// With destroy-when-empty enabled, a file whose remaining sections are
  /// all destroyed (vacuously, a file with none) is deleted instead of
  /// rewritten. A file with no pending changes is left untouched, so a
  /// second store with no mutation in between performs no write or delete.
  pub fn store<S: FileIo>(&mut self, io: &S) -> Result<()> {
    if self.destroy_empty && self.sections().all(Section::is_destroyed) {
      // probe first: the file may already be gone, or never written at all
      if io.read(&self.path)?.is_some() {
        #[cfg(feature = "tracing")]
        debug!("deleting {}", self.path.display());
        io.delete(&self.path)?;
      }
    } else if self.sections().any(Section::is_dirty) {
      #[cfg(feature = "tracing")]
      debug!("rewriting {}", self.path.display());
      io.write(&self.path, &self.to_string())?;
    }

    self
      .contents
      .retain(|content| !matches!(content, Content::Section(section) if section.is_destroyed()));
    for content in &mut self.contents {
      if let Content::Section(section) = content {
        section.mark_clean();
      }
    }
    Ok(())
  }
}

impl fmt::Display for PhysicalFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for content in &self.contents {
      match content {
        Content::Raw(text) => write!(f, "{text}")?,
        Content::Section(section) => write!(f, "{section}")?,
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::io::MemoryIo;

  const SAMPLE: &str = "\
# database settings

[main]
host=localhost
; override in production
port=5432

[backup]
host=standby
";

  fn parsed(text: &str) -> PhysicalFile {
    let mut file = PhysicalFile::new("sample.ini");
    file.parse(text).unwrap();
    file
  }

  #[test]
  fn test_roundtrip_is_byte_identical() {
    assert_eq!(parsed(SAMPLE).to_string(), SAMPLE);
  }

  #[test]
  fn test_roundtrip_without_trailing_newline() {
    let input = "[main]\nkey=value";
    let file = parsed(input);
    // properties always render newline-terminated
    assert_eq!(file.to_string(), "[main]\nkey=value\n");
  }

  #[test]
  fn test_parse_populates_sections() {
    let file = parsed(SAMPLE);
    let main = file.get_section("main").unwrap();
    assert_eq!(main.get("host"), Some("localhost"));
    assert_eq!(main.get("port"), Some("5432"));
    assert_eq!(file.get_section("backup").unwrap().get("host"), Some("standby"));
    assert_eq!(file.get_section("missing"), None);
  }

  #[test]
  fn test_parse_leaves_sections_clean() {
    let file = parsed(SAMPLE);
    assert!(file.sections().all(|section| !section.is_dirty()));
  }

  #[test]
  fn test_continuation_joining() {
    let file = parsed("[main]\nmotd=first\n  second\n\tthird\n");
    assert_eq!(
      file.get_section("main").unwrap().get("motd"),
      Some("first\nsecond\nthird")
    );
  }

  #[test]
  fn test_continuation_survives_interleaved_comment() {
    let file = parsed("[main]\nmotd=first\n# aside\n  second\n");
    assert_eq!(
      file.get_section("main").unwrap().get("motd"),
      Some("first\nsecond")
    );
  }

  #[test]
  fn test_duplicate_section_is_an_error() {
    let mut file = PhysicalFile::new("sample.ini");
    let err = file.parse("[main]\na=1\n[main]\n").unwrap_err();
    assert_eq!(
      err,
      ParseError::DuplicateSection {
        path: PathBuf::from("sample.ini"),
        line: 3,
        name: "main".to_owned(),
      }
    );
  }

  #[test]
  fn test_property_outside_section_is_an_error() {
    let mut file = PhysicalFile::new("sample.ini");
    let err = file.parse("a=1\n").unwrap_err();
    assert_eq!(
      err,
      ParseError::PropertyOutsideSection {
        path: PathBuf::from("sample.ini"),
        line: 1,
        key: "a".to_owned(),
      }
    );
  }

  #[test]
  fn test_invalid_line_reports_path_and_line() {
    let mut file = PhysicalFile::new("sample.ini");
    let err = file.parse("not valid\n").unwrap_err();
    assert_eq!(
      err,
      ParseError::InvalidLine {
        path: PathBuf::from("sample.ini"),
        line: 1,
        text: "not valid".to_owned(),
      }
    );
    assert_eq!(err.to_string(), "sample.ini:1: unparseable line: \"not valid\"");
  }

  #[test]
  fn test_read_missing_file_is_not_found() {
    let io = MemoryIo::new();
    let mut file = PhysicalFile::new("absent.ini");
    let err = file.read(&io).unwrap_err();
    assert!(matches!(err, Error::NotFound { path } if path == PathBuf::from("absent.ini")));
  }

  #[test]
  fn test_store_skips_clean_files() {
    let io = MemoryIo::new();
    io.insert("sample.ini", SAMPLE);

    let mut file = PhysicalFile::new("sample.ini");
    file.read(&io).unwrap();
    file.store(&io).unwrap();

    assert!(io.writes().is_empty());
    assert!(io.deletes().is_empty());
  }

  #[test]
  fn test_store_rewrites_dirty_files_once() {
    let io = MemoryIo::new();
    io.insert("sample.ini", "[main]\nhost=localhost\n");

    let mut file = PhysicalFile::new("sample.ini");
    file.read(&io).unwrap();
    file.get_section_mut("main").unwrap().set("host", "example.com");

    file.store(&io).unwrap();
    assert_eq!(
      io.contents("sample.ini").as_deref(),
      Some("[main]\nhost=example.com\n")
    );

    // no mutation since the last store: no further I/O
    file.store(&io).unwrap();
    assert_eq!(io.writes().len(), 1);
  }

  #[test]
  fn test_set_to_same_value_still_rewrites() {
    let io = MemoryIo::new();
    io.insert("sample.ini", "[main]\nhost=localhost\n");

    let mut file = PhysicalFile::new("sample.ini");
    file.read(&io).unwrap();
    file.get_section_mut("main").unwrap().set("host", "localhost");

    file.store(&io).unwrap();
    assert_eq!(io.writes().len(), 1);
  }

  #[test]
  fn test_destroyed_section_disappears_from_output() {
    let io = MemoryIo::new();
    io.insert("sample.ini", SAMPLE);

    let mut file = PhysicalFile::new("sample.ini");
    file.read(&io).unwrap();
    file.get_section_mut("backup").unwrap().destroy();
    file.store(&io).unwrap();

    let rewritten = io.contents("sample.ini").unwrap();
    assert!(!rewritten.contains("[backup]"));
    assert!(!rewritten.contains("standby"));
    assert!(rewritten.contains("[main]"));
    assert_eq!(file.get_section("backup"), None);
  }

  #[test]
  fn test_destroy_empty_deletes_the_file() {
    let io = MemoryIo::new();
    io.insert("sample.ini", "[main]\nhost=localhost\n");

    let mut file = PhysicalFile::new("sample.ini");
    file.set_destroy_empty(true);
    file.read(&io).unwrap();
    file.get_section_mut("main").unwrap().destroy();

    file.store(&io).unwrap();
    assert_eq!(io.contents("sample.ini"), None);
    assert_eq!(io.deletes().len(), 1);

    // second pass finds nothing left to delete
    file.store(&io).unwrap();
    assert_eq!(io.deletes().len(), 1);
  }

  #[test]
  fn test_destroy_empty_off_rewrites_instead() {
    let io = MemoryIo::new();
    io.insert("sample.ini", "# header\n[main]\nhost=localhost\n");

    let mut file = PhysicalFile::new("sample.ini");
    file.read(&io).unwrap();
    file.get_section_mut("main").unwrap().destroy();
    file.store(&io).unwrap();

    assert_eq!(io.contents("sample.ini").as_deref(), Some("# header\n"));
  }

  #[test]
  fn test_add_section_persists_on_store() {
    let io = MemoryIo::new();
    let mut file = PhysicalFile::new("fresh.ini");
    file.add_section("main").unwrap().set("host", "localhost");
    file.store(&io).unwrap();

    assert_eq!(io.contents("fresh.ini").as_deref(), Some("[main]\nhost=localhost\n"));
  }

  #[test]
  fn test_add_section_rejects_duplicates() {
    let mut file = PhysicalFile::new("fresh.ini");
    file.add_section("main").unwrap();
    let err = file.add_section("main").unwrap_err();
    assert!(matches!(
      err,
      Error::Parse(ParseError::SectionExists { name, .. }) if name == "main"
    ));
  }

  #[test]
  fn test_pre_section_text_is_preserved() {
    let input = "# top comment\n\n[main]\nkey=value\n";
    let file = parsed(input);
    assert_eq!(file.to_string(), input);
  }
}
