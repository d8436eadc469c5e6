//! Membership toggles on index files.

use std::path::Path;

use serde_json::Value;

use super::record::IndexRecord;
use crate::backend::StorageBackend;
use crate::errors::StoreResult;
use crate::naming::{file_name, value_string};
use crate::observability::{Event, Logger};

/// Record that `key` currently has `value` for the field indexed in `dir`.
///
/// Returns `true` if the index file changed, `false` if `key` was already
/// listed. Only a change is persisted.
pub fn index(
    backend: &dyn StorageBackend,
    value: &Value,
    key: &Value,
    dir: &Path,
) -> StoreResult<bool> {
    let mut record = IndexRecord::load(backend, dir, value);
    if !record.insert(value, key) {
        return Ok(false);
    }
    record.save(backend, dir, value)?;
    log_update("index", value, key, dir);
    Ok(true)
}

/// Record that `key` no longer has `value` for the field indexed in `dir`.
///
/// Returns `true` if `key` was listed and has been removed.
pub fn deindex(
    backend: &dyn StorageBackend,
    value: &Value,
    key: &Value,
    dir: &Path,
) -> StoreResult<bool> {
    let mut record = IndexRecord::load(backend, dir, value);
    if !record.remove(value, key) {
        return Ok(false);
    }
    record.save(backend, dir, value)?;
    log_update("deindex", value, key, dir);
    Ok(true)
}

fn log_update(action: &str, value: &Value, key: &Value, dir: &Path) {
    let dir = dir.display().to_string();
    let file = file_name(value);
    let key = value_string(key);
    Logger::trace(
        Event::IndexUpdated,
        &[
            ("action", action),
            ("dir", dir.as_str()),
            ("file", file.as_str()),
            ("key", key.as_str()),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    #[test]
    fn test_index_twice_changes_once() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");
        let key = json!("a");

        assert!(index(&backend, &value, &key, dir).unwrap());
        assert!(!index(&backend, &value, &key, dir).unwrap());

        let record = IndexRecord::load(&backend, dir, &value);
        assert_eq!(record.keys(&value), &[json!("a")]);
    }

    #[test]
    fn test_deindex_absent_key_writes_nothing() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");

        assert!(!deindex(&backend, &json!("open"), &json!("a"), dir).unwrap());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_deindex_leaves_empty_entry_on_disk() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");
        let key = json!("a");

        index(&backend, &value, &key, dir).unwrap();
        assert!(deindex(&backend, &value, &key, dir).unwrap());

        let bytes = backend.read(&IndexRecord::path(dir, &value)).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, json!({ "b3Blbg==": [] }));
    }

    #[test]
    fn test_corrupt_index_file_heals_on_write() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");

        backend
            .write(&IndexRecord::path(dir, &value), b"garbage")
            .unwrap();
        assert!(index(&backend, &value, &json!("b"), dir).unwrap());

        let record = IndexRecord::load(&backend, dir, &value);
        assert_eq!(record.keys(&value), &[json!("b")]);
    }
}
