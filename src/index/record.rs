//! One index file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::StorageBackend;
use crate::errors::{StoreError, StoreResult};
use crate::naming::{file_name, value64};

/// Contents of a single index file: encoded value -> keys
///
/// Entries are kept as raw JSON so that a malformed entry only affects its
/// own value; the others are written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexRecord {
    entries: Map<String, Value>,
}

impl IndexRecord {
    /// Path of the index file holding `value` inside `dir`.
    pub fn path(dir: &Path, value: &Value) -> PathBuf {
        dir.join(file_name(value))
    }

    /// Load the index file for `value`, or an empty record if the file is
    /// missing, unreadable or not a JSON object.
    pub fn load(backend: &dyn StorageBackend, dir: &Path, value: &Value) -> Self {
        let path = Self::path(dir, value);
        backend
            .read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    /// Write the whole record back as pretty JSON.
    pub fn save(&self, backend: &dyn StorageBackend, dir: &Path, value: &Value) -> StoreResult<()> {
        let path = Self::path(dir, value);
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            StoreError::configuration(format!("unserializable index record: {}", e))
        })?;
        backend.write(&path, contents.as_bytes())?;
        Ok(())
    }

    /// Keys currently recorded for `value`. An entry that is not a list
    /// reads as empty.
    pub fn keys(&self, value: &Value) -> &[Value] {
        self.entries
            .get(&value64(value))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add `key` under `value`. Returns false if it was already present.
    ///
    /// An entry that is not a list is replaced by a fresh one.
    pub fn insert(&mut self, value: &Value, key: &Value) -> bool {
        let encoded = value64(value);
        let mut keys = match self.entries.remove(&encoded) {
            Some(Value::Array(keys)) => keys,
            _ => Vec::new(),
        };
        let added = !keys.contains(key);
        if added {
            keys.push(key.clone());
        }
        self.entries.insert(encoded, Value::Array(keys));
        added
    }

    /// Remove `key` from `value`. Returns false if it was not present.
    ///
    /// The entry itself stays, possibly empty.
    pub fn remove(&mut self, value: &Value, key: &Value) -> bool {
        let keys = match self
            .entries
            .get_mut(&value64(value))
            .and_then(Value::as_array_mut)
        {
            Some(keys) => keys,
            None => return false,
        };
        match keys.iter().position(|k| k == key) {
            Some(position) => {
                keys.remove(position);
                true
            }
            None => false,
        }
    }

    /// Encoded values present in this file
    pub fn encoded_values(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    #[test]
    fn test_insert_is_set_like() {
        let mut record = IndexRecord::default();
        let value = json!("open");

        assert!(record.insert(&value, &json!("a")));
        assert!(!record.insert(&value, &json!("a")));
        assert!(record.insert(&value, &json!("b")));
        assert_eq!(record.keys(&value), &[json!("a"), json!("b")]);
    }

    #[test]
    fn test_remove_keeps_empty_entry() {
        let mut record = IndexRecord::default();
        let value = json!("open");

        record.insert(&value, &json!("a"));
        assert!(record.remove(&value, &json!("a")));
        assert!(!record.remove(&value, &json!("a")));
        assert!(record.keys(&value).is_empty());
        assert_eq!(record.encoded_values().count(), 1);
    }

    #[test]
    fn test_on_disk_shape() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");

        let mut record = IndexRecord::default();
        record.insert(&value, &json!("a"));
        record.save(&backend, dir, &value).unwrap();

        let bytes = backend.read(&IndexRecord::path(dir, &value)).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, json!({ "b3Blbg==": ["a"] }));
    }

    #[test]
    fn test_garbage_file_loads_empty() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");

        backend
            .write(&IndexRecord::path(dir, &value), b"{not json")
            .unwrap();
        assert!(IndexRecord::load(&backend, dir, &value).is_empty());

        backend
            .write(&IndexRecord::path(dir, &value), b"[1, 2]")
            .unwrap();
        assert!(IndexRecord::load(&backend, dir, &value).is_empty());
    }

    #[test]
    fn test_malformed_entry_spares_its_neighbours() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/idx/status");
        let value = json!("open");
        let path = IndexRecord::path(dir, &value);

        backend
            .write(&path, br#"{"b3Blbg==": "junk", "c2hhcmVk": ["x"]}"#)
            .unwrap();

        let mut record = IndexRecord::load(&backend, dir, &value);
        assert!(record.keys(&value).is_empty());
        assert!(!record.remove(&value, &json!("a")));
        assert!(record.insert(&value, &json!("a")));
        record.save(&backend, dir, &value).unwrap();

        let parsed: Value = serde_json::from_slice(&backend.read(&path).unwrap()).unwrap();
        assert_eq!(parsed, json!({"b3Blbg==": ["a"], "c2hhcmVk": ["x"]}));
    }
}
