//! Table configuration.
//!
//! Stored as JSON with camelCase keys:
//!
//! ```json
//! {
//!   "tableBase": "/data/tickets/tableInfo.json",
//!   "name": "tickets",
//!   "indexes": ["status"],
//!   "indexBase": { "status": "/data/tickets-index/status" }
//! }
//! ```
//!
//! The table's records live in the directory containing `tableBase`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};

/// Reserved name for the table's own configuration file
pub const TABLE_INFO_FILE: &str = "tableInfo.json";

/// Reserved name for an index manifest
pub const INDEXES_FILE: &str = "indexes.json";

/// Files in a table directory that are never records
pub const RESERVED_NAMES: [&str; 2] = [TABLE_INFO_FILE, INDEXES_FILE];

/// Static description of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    /// A path inside the table directory; its parent is the storage root
    pub table_base: PathBuf,
    pub name: String,
    /// Indexed field names, in order
    #[serde(default)]
    pub indexes: Vec<String>,
    /// Index directory per indexed field
    #[serde(default)]
    pub index_base: BTreeMap<String, PathBuf>,
}

impl TableInfo {
    /// A table with no indexes rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            table_base: dir.as_ref().join(TABLE_INFO_FILE),
            name: name.into(),
            indexes: Vec::new(),
            index_base: BTreeMap::new(),
        }
    }

    /// Declare an indexed field stored in `dir`.
    pub fn with_index(mut self, field: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let field = field.into();
        if !self.indexes.contains(&field) {
            self.indexes.push(field.clone());
        }
        self.index_base.insert(field, dir.into());
        self
    }

    /// Load table info from a JSON file.
    ///
    /// Relative paths inside the file are taken relative to the file's own
    /// directory.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::configuration(format!(
                "failed to read table info {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut info: TableInfo = serde_json::from_str(&content).map_err(|e| {
            StoreError::configuration(format!("invalid table info {}: {}", path.display(), e))
        })?;

        if let Some(base) = path.parent() {
            info.table_base = anchor(base, &info.table_base);
            for dir in info.index_base.values_mut() {
                *dir = anchor(base, dir);
            }
        }

        info.validate()?;
        Ok(info)
    }

    /// Check the info is usable for opening a table.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::configuration("table name must not be empty"));
        }

        if self.table_base.as_os_str().is_empty() {
            return Err(StoreError::configuration(format!(
                "table {} has no tableBase",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.indexes {
            if !seen.insert(field.as_str()) {
                return Err(StoreError::configuration(format!(
                    "field {} is indexed twice in table {}",
                    field, self.name
                )));
            }
            if !self.index_base.contains_key(field) {
                return Err(StoreError::configuration(format!(
                    "indexed field {} of table {} has no indexBase entry",
                    field, self.name
                )));
            }
        }

        Ok(())
    }

    /// Directory holding the table's primary records.
    pub fn root(&self) -> PathBuf {
        match self.table_base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexes.iter().any(|f| f == field)
    }

    /// Index directory for `field`, if it is indexed.
    pub fn index_dir(&self, field: &str) -> Option<&Path> {
        if !self.is_indexed(field) {
            return None;
        }
        self.index_base.get(field).map(PathBuf::as_path)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
