//! # Local Filesystem Backend

use std::fs;
use std::path::Path;

use super::errors::{BackendError, BackendResult};
use super::StorageBackend;

/// Backend over the real filesystem.
///
/// Paths are used as given; parent directories are created on write.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalBackend;

impl LocalBackend {
    /// Create a new local backend
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for LocalBackend {
    fn write(&self, path: &Path, data: &[u8]) -> BackendResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BackendError::io(parent, e))?;
            }
        }

        fs::write(path, data).map_err(|e| BackendError::io(path, e))
    }

    fn read(&self, path: &Path) -> BackendResult<Vec<u8>> {
        fs::read(path).map_err(|e| BackendError::io(path, e))
    }

    fn delete(&self, path: &Path) -> BackendResult<()> {
        fs::remove_file(path).map_err(|e| BackendError::io(path, e))
    }

    fn exists(&self, path: &Path) -> BackendResult<bool> {
        Ok(path.is_file())
    }

    fn list(&self, dir: &Path) -> BackendResult<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BackendError::io(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BackendError::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| BackendError::io(dir, e))?;
            if !file_type.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }
}
