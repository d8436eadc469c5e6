//! # In-Memory Backend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::{BackendError, BackendResult};
use super::StorageBackend;

/// Backend that keeps every file in a shared map.
///
/// Clones share the same files. Listing order is path order.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently stored
    pub fn len(&self) -> usize {
        self.files().len()
    }

    /// Whether no files are stored
    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<u8>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn write(&self, path: &Path, data: &[u8]) -> BackendResult<()> {
        self.files().insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> BackendResult<Vec<u8>> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(path.to_path_buf()))
    }

    fn delete(&self, path: &Path) -> BackendResult<()> {
        self.files()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> BackendResult<bool> {
        Ok(self.files().contains_key(path))
    }

    fn list(&self, dir: &Path) -> BackendResult<Vec<String>> {
        let names = self
            .files()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_files() {
        let a = MemoryBackend::new();
        let b = a.clone();

        a.write(Path::new("/t/x.json"), b"x").unwrap();
        assert_eq!(b.read(Path::new("/t/x.json")).unwrap(), b"x");
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_list_is_one_level_deep() {
        let backend = MemoryBackend::new();
        backend.write(Path::new("/t/a.json"), b"a").unwrap();
        backend.write(Path::new("/t/b.json"), b"b").unwrap();
        backend.write(Path::new("/t/idx/c.json"), b"c").unwrap();

        let names = backend.list(Path::new("/t")).unwrap();
        assert_eq!(names, vec!["a.json".to_string(), "b.json".to_string()]);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend.delete(Path::new("/t/none.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}
