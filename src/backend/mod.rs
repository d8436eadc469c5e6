//! Storage backends for filetable
//!
//! The record store never touches the filesystem directly. Every read,
//! write and listing goes through a [`StorageBackend`], so the same table
//! logic runs against a real directory tree or an in-memory map.
//!
//! Backends offer no atomicity beyond what a single `write` provides.

mod errors;
mod local;
mod memory;

pub use errors::{BackendError, BackendResult};
pub use local::LocalBackend;
pub use memory::MemoryBackend;

use std::path::Path;

/// Synchronous byte-blob store addressed by path.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Write `data` to `path`, replacing any existing contents.
    fn write(&self, path: &Path, data: &[u8]) -> BackendResult<()>;

    /// Read the full contents of `path`.
    fn read(&self, path: &Path) -> BackendResult<Vec<u8>>;

    /// Delete the file at `path`.
    fn delete(&self, path: &Path) -> BackendResult<()>;

    /// Check if a file exists at `path`.
    fn exists(&self, path: &Path) -> BackendResult<bool>;

    /// List the names of the regular files directly inside `dir`.
    ///
    /// A missing directory lists as empty.
    fn list(&self, dir: &Path) -> BackendResult<Vec<String>>;
}
