//! File access collaborator.
//!
//! The document model never touches the filesystem directly; all reads,
//! writes and deletes go through [`FileIo`] so host tools can substitute
//! their own transport and tests can run fully in memory. `read`
//! distinguishes an absent file from other failures; callers decide whether
//! absence is an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

pub trait FileIo {
  /// Reads the full contents at `path`, or `None` when the file is absent.
  fn read(&self, path: &Path) -> io::Result<Option<String>>;

  /// Overwrites `path` with `contents`.
  fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

  /// Removes `path`.
  fn delete(&self, path: &Path) -> io::Result<()>;
}

/// Direct `std::fs` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskIo;

impl FileIo for DiskIo {
  fn read(&self, path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
      Ok(text) => Ok(Some(text)),
      Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
      Err(err) => Err(err),
    }
  }

  fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
  }

  fn delete(&self, path: &Path) -> io::Result<()> {
    fs::remove_file(path)
  }
}

/// In-memory implementation that records every write and delete, for tests
/// that assert which files a store pass actually touched.
#[derive(Debug, Default)]
pub struct MemoryIo {
  files: RefCell<HashMap<PathBuf, String>>,
  writes: RefCell<Vec<PathBuf>>,
  deletes: RefCell<Vec<PathBuf>>,
}

impl MemoryIo {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds a file before the model reads it.
  pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
    self.files.borrow_mut().insert(path.into(), contents.into());
  }

  /// Current contents at `path`, if the file exists.
  pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
    self.files.borrow().get(path.as_ref()).cloned()
  }

  /// Paths written so far, in order.
  pub fn writes(&self) -> Vec<PathBuf> {
    self.writes.borrow().clone()
  }

  /// Paths deleted so far, in order.
  pub fn deletes(&self) -> Vec<PathBuf> {
    self.deletes.borrow().clone()
  }
}

impl FileIo for MemoryIo {
  fn read(&self, path: &Path) -> io::Result<Option<String>> {
    Ok(self.files.borrow().get(path).cloned())
  }

  fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
    self
      .files
      .borrow_mut()
      .insert(path.to_path_buf(), contents.to_owned());
    self.writes.borrow_mut().push(path.to_path_buf());
    Ok(())
  }

  fn delete(&self, path: &Path) -> io::Result<()> {
    match self.files.borrow_mut().remove(path) {
      Some(_) => {
        self.deletes.borrow_mut().push(path.to_path_buf());
        Ok(())
      }
      None => Err(io::Error::new(ErrorKind::NotFound, "no such file")),
    }
  }
}
