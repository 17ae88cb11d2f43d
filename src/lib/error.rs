use std::path::PathBuf;

/// Grammar and structural violations raised while reading an INI document.
///
/// Variants carry the source path, and the 1-based line number where one
/// exists, so a host tool can point at the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  /// Line matched none of the grammar rules.
  #[error("{}:{line}: unparseable line: {text:?}", .path.display())]
  InvalidLine {
    path: PathBuf,
    line: usize,
    text: String,
  },
  /// A `[name]` header re-used a name already defined in the same file.
  #[error("{}:{line}: section [{name}] is already defined", .path.display())]
  DuplicateSection {
    path: PathBuf,
    line: usize,
    name: String,
  },
  /// A property line appeared before any `[name]` header.
  #[error("{}:{line}: property {key:?} outside of any section", .path.display())]
  PropertyOutsideSection {
    path: PathBuf,
    line: usize,
    key: String,
  },
  /// A section was added programmatically under a name the file already has.
  #[error("{}: section [{name}] is already defined", .path.display())]
  SectionExists { path: PathBuf, name: String },
}

/// Errors surfaced by file and collection operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The backing file does not exist.
  #[error("file not found: {}", .path.display())]
  NotFound { path: PathBuf },
  /// The file exists but is not valid INI input.
  #[error(transparent)]
  Parse(#[from] ParseError),
  /// Propagated unmodified from the I/O collaborator.
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
