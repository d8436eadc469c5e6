//! Table with secondary indexes.

use std::path::Path;

use serde_json::Value;

use super::compare::loosely_equal;
use super::info::TableInfo;
use super::table::Table;
use crate::backend::{LocalBackend, StorageBackend};
use crate::errors::{StoreError, StoreResult};
use crate::greenlight::Greenlight;
use crate::index::{deindex, index, IndexRecord};
use crate::naming::value_string;
use crate::observability::{Event, Logger};

static NULL: Value = Value::Null;

/// A [`Table`] that keeps one reverse index per declared field.
///
/// Indexes only ever reflect records that were actually written: if the
/// write is denied or fails, no index file is touched. Index entries may go
/// stale if primary files are changed behind the table's back.
#[derive(Debug)]
pub struct IndexedTable<B: StorageBackend = LocalBackend> {
    table: Table<B>,
}

impl IndexedTable<LocalBackend> {
    /// Open an indexed table on the local filesystem.
    pub fn open(info: TableInfo) -> StoreResult<Self> {
        Self::with_backend(info, LocalBackend::new())
    }
}

impl<B: StorageBackend> IndexedTable<B> {
    pub fn with_backend(info: TableInfo, backend: B) -> StoreResult<Self> {
        Ok(Self {
            table: Table::with_backend(info, backend)?,
        })
    }

    /// The underlying primary store.
    pub fn table(&self) -> &Table<B> {
        &self.table
    }

    pub fn table_info(&self) -> &TableInfo {
        self.table.table_info()
    }

    pub fn get(&self, key: &Value, gate: &Greenlight) -> StoreResult<Value> {
        self.table.get(key, gate)
    }

    pub fn get_all(&self, gate: &Greenlight) -> StoreResult<Vec<Value>> {
        self.table.get_all(gate)
    }

    /// Store `record` under `key` and bring every index up to date.
    ///
    /// Any failure to read the previous record (missing or corrupt) counts
    /// as "no previous record". For each indexed field whose value changed,
    /// the key is removed from the old value's entry (when there was a
    /// previous record) and added to the new value's entry. A missing field
    /// reads as `null`.
    ///
    /// Returns how many of those index calls changed a file, between zero
    /// and twice the number of indexed fields.
    pub fn put(&self, key: &Value, record: &Value, gate: &Greenlight) -> StoreResult<usize> {
        let _guard = self.table.lock_writes();

        let old_record = self.table.get(key, &Greenlight::None).ok();

        self.table.write_record(key, record, gate)?;

        let info = self.table.table_info();
        let backend = self.table.backend();
        let mut updated = 0;

        for field in &info.indexes {
            let dir = self.index_dir(field)?;
            let new_value = field_value(record, field);
            let old_value = old_record
                .as_ref()
                .map_or(&NULL, |old| field_value(old, field));

            if loosely_equal(old_value, new_value) {
                continue;
            }

            if old_record.is_some() && deindex(backend, old_value, key, dir)? {
                updated += 1;
            }
            if index(backend, new_value, key, dir)? {
                updated += 1;
            }
        }

        Ok(updated)
    }

    /// Keys whose records currently hold `value` in `field`.
    ///
    /// A value that was never indexed yields an empty list.
    ///
    /// # Errors
    ///
    /// `Configuration` if `field` is not indexed for this table.
    pub fn get_all_matching_keys_from_index(
        &self,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<Value>> {
        let dir = self.index_dir(field)?;
        let record = IndexRecord::load(self.table.backend(), dir, value);
        Ok(record.keys(value).to_vec())
    }

    /// Records whose `field` holds `value`, paired with their keys.
    ///
    /// A key whose record can no longer be read is logged and paired with
    /// `None`; it does not stop the remaining keys from resolving.
    pub fn get_all_matching_records_from_index(
        &self,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(Value, Option<Value>)>> {
        let keys = self.get_all_matching_keys_from_index(field, value)?;

        let mut matches = Vec::with_capacity(keys.len());
        for key in keys {
            match self.table.get(&key, &Greenlight::None) {
                Ok(record) => matches.push((key, Some(record))),
                Err(err) => {
                    Logger::info(
                        Event::StaleIndexKey,
                        &[
                            ("code", err.code()),
                            ("field", field),
                            ("key", value_string(&key).as_str()),
                            ("table", self.table.name()),
                        ],
                    );
                    matches.push((key, None));
                }
            }
        }

        Ok(matches)
    }

    fn index_dir(&self, field: &str) -> StoreResult<&Path> {
        let info = self.table.table_info();
        info.index_dir(field).ok_or_else(|| {
            StoreError::configuration(format!(
                "Property {} is not indexed for table {}",
                field, info.name
            ))
        })
    }
}

fn field_value<'a>(record: &'a Value, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&NULL)
}
