//! A logical configuration spanning several physical files.

use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::Result;
use crate::file::PhysicalFile;
use crate::io::{DiskIo, FileIo};
use crate::section::Section;

/// Registry of [`PhysicalFile`]s presenting one section namespace.
///
/// Files are kept in registration order. When two files define a section of
/// the same name, lookups resolve to the file registered last. Instances are
/// meant for session-style use (read, mutate, store, discard); nothing is
/// shared or locked internally.
#[derive(Debug, Default)]
pub struct FileCollection<S = DiskIo> {
  io: S,
  files: Vec<PhysicalFile>,
  destroy_empty: bool,
}

impl FileCollection<DiskIo> {
  /// Collection backed by the real filesystem.
  pub fn new() -> Self {
    Self::with_io(DiskIo)
  }
}

impl<S: FileIo> FileCollection<S> {
  /// Collection backed by a custom I/O collaborator.
  pub fn with_io(io: S) -> Self {
    Self {
      io,
      files: Vec::new(),
      destroy_empty: false,
    }
  }

  /// Applies the destroy-when-empty store policy to every registered file
  /// and to files registered later.
  pub fn set_destroy_empty(&mut self, destroy_empty: bool) {
    self.destroy_empty = destroy_empty;
    for file in &mut self.files {
      file.set_destroy_empty(destroy_empty);
    }
  }

  /// Reads and registers the file at `path`.
  ///
  /// Re-reading an already registered path replaces the earlier model in
  /// place. Parse failures abort the read and leave the registry unchanged.
  pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    #[cfg(feature = "tracing")]
    debug!("reading {}", path.display());

    let mut file = PhysicalFile::new(path);
    file.set_destroy_empty(self.destroy_empty);
    file.read(&self.io)?;

    match self.files.iter().position(|known| known.path() == path) {
      Some(at) => self.files[at] = file,
      None => self.files.push(file),
    }
    Ok(())
  }

  /// Looks `name` up across all files; the last registered match wins.
  pub fn get_section(&self, name: &str) -> Option<&Section> {
    self
      .files
      .iter()
      .rev()
      .find_map(|file| file.get_section(name))
  }

  /// Mutable counterpart of [`FileCollection::get_section`].
  pub fn get_section_mut(&mut self, name: &str) -> Option<&mut Section> {
    self
      .files
      .iter_mut()
      .rev()
      .find_map(|file| file.get_section_mut(name))
  }

  /// True when any registered file defines `name`.
  pub fn contains_section(&self, name: &str) -> bool {
    self.get_section(name).is_some()
  }

  /// Creates a new section named `name` in the file at `path`, registering
  /// that file first if it is not tracked yet.
  pub fn add_section(&mut self, name: &str, path: impl AsRef<Path>) -> Result<&mut Section> {
    let path = path.as_ref();
    let at = match self.files.iter().position(|known| known.path() == path) {
      Some(at) => at,
      None => {
        #[cfg(feature = "tracing")]
        debug!("registering {}", path.display());
        let mut file = PhysicalFile::new(path);
        file.set_destroy_empty(self.destroy_empty);
        self.files.push(file);
        self.files.len() - 1
      }
    };
    self.files[at].add_section(name)
  }

  /// Stores every registered file in registration order.
  ///
  /// The first failure propagates immediately: earlier files are already
  /// written or deleted, later files are untouched.
  pub fn store(&mut self) -> Result<()> {
    for file in &mut self.files {
      file.store(&self.io)?;
    }
    Ok(())
  }

  /// All sections across all files, in file-then-item order.
  pub fn sections(&self) -> impl Iterator<Item = &Section> {
    self.files.iter().flat_map(|file| file.sections())
  }

  /// Paths of all registered files, in registration order.
  pub fn paths(&self) -> impl Iterator<Item = &Path> {
    self.files.iter().map(PhysicalFile::path)
  }
}
