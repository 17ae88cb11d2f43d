//! Format-preserving INI document model.
//!
//! This library models one or more INI-style files so configuration tooling
//! can make targeted key edits and write the result back without spurious
//! diffs: comments, blank lines and key ordering all survive a round trip
//! untouched.
//!
//! # Features
//!
//! - **Byte fidelity**: unmutated input serializes back byte-identical
//! - **Change tracking**: any write latches a per-section dirty flag, and
//!   only files with pending changes are rewritten on store
//! - **Multi-file namespaces**: one logical configuration can span several
//!   physical files behind a single section lookup
//! - **Pluggable I/O**: all file access goes through a small collaborator
//!   trait, with an in-memory implementation for tests
//! - **Optional tracing**: detailed logging when the `tracing` feature is
//!   enabled
//!
//! # Example
//!
//! ```rust,no_run
//! use ini_patch::collection::FileCollection;
//!
//! # fn main() -> ini_patch::error::Result<()> {
//! let mut config = FileCollection::new();
//! config.read("/etc/example/main.ini")?;
//! config.read("/etc/example/conf.d/extra.ini")?;
//!
//! if let Some(server) = config.get_section_mut("server") {
//!   server.set("port", "8080");
//! }
//!
//! // rewrites only the file that actually changed
//! config.store()?;
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod error;
pub mod file;
pub mod io;
pub mod parse;
pub mod section;
