//! Primary record store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::info::{TableInfo, RESERVED_NAMES};
use crate::backend::{LocalBackend, StorageBackend};
use crate::errors::{StoreError, StoreResult};
use crate::greenlight::{GateContext, Greenlight};
use crate::naming::{file_name, value_string};
use crate::observability::{Event, Logger};

/// A directory of hashed JSON record files.
///
/// Records are written as pretty JSON to `<hex hash(key)>.json` under the
/// table root. Keys that collide share a file; the later write wins.
#[derive(Debug)]
pub struct Table<B: StorageBackend = LocalBackend> {
    info: TableInfo,
    root: PathBuf,
    backend: B,
    /// Serializes writes from this process
    writes: Mutex<()>,
}

impl Table<LocalBackend> {
    /// Open a table on the local filesystem.
    pub fn open(info: TableInfo) -> StoreResult<Self> {
        Self::with_backend(info, LocalBackend::new())
    }
}

impl<B: StorageBackend> Table<B> {
    /// Open a table over any backend.
    ///
    /// # Errors
    ///
    /// `Configuration` if the table info does not validate.
    pub fn with_backend(info: TableInfo, backend: B) -> StoreResult<Self> {
        info.validate()?;
        let root = info.root();

        Logger::trace(
            Event::TableOpened,
            &[
                ("root", root.display().to_string().as_str()),
                ("table", info.name.as_str()),
            ],
        );

        Ok(Self {
            info,
            root,
            backend,
            writes: Mutex::new(()),
        })
    }

    pub fn table_info(&self) -> &TableInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Directory holding the primary record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Path of the file that holds (or would hold) `key`'s record.
    pub fn record_path(&self, key: &Value) -> PathBuf {
        self.root.join(file_name(key))
    }

    /// Store `record` under `key`, replacing whatever was there.
    ///
    /// The gate sees `{key, record, recordString}` before anything is
    /// written; a denial leaves the table untouched.
    pub fn put(&self, key: &Value, record: &Value, gate: &Greenlight) -> StoreResult<()> {
        let _guard = self.lock_writes();
        self.write_record(key, record, gate)
    }

    /// Read the record stored under `key`.
    ///
    /// The gate sees `{key, record}` after the file has been read; a denial
    /// withholds the value but cannot undo the read.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is missing or unreadable
    /// - `Corrupt` if the file is not valid JSON
    /// - `Denied` if the gate refuses
    pub fn get(&self, key: &Value, gate: &Greenlight) -> StoreResult<Value> {
        let path = self.record_path(key);

        let bytes = self.backend.read(&path).map_err(|_| StoreError::NotFound {
            key: value_string(key),
        })?;
        let record = parse_record(&path, &bytes)?;

        Logger::trace(
            Event::RecordRead,
            &[("key", value_string(key).as_str()), ("table", self.info.name.as_str())],
        );

        self.guard(gate, &GateContext::for_get(key, &record))?;
        Ok(record)
    }

    /// Read every record in the table, in directory listing order.
    ///
    /// Reserved metadata files are skipped. One corrupt file fails the
    /// whole scan. The gate sees the full `{list}` once; a denial withholds
    /// every record.
    pub fn get_all(&self, gate: &Greenlight) -> StoreResult<Vec<Value>> {
        let names = self.backend.list(&self.root)?;

        let mut list = Vec::with_capacity(names.len());
        for name in names {
            if RESERVED_NAMES.contains(&name.as_str()) {
                continue;
            }
            let path = self.root.join(&name);
            let bytes = self.backend.read(&path)?;
            list.push(parse_record(&path, &bytes)?);
        }

        Logger::trace(
            Event::TableScanned,
            &[
                ("records", list.len().to_string().as_str()),
                ("table", self.info.name.as_str()),
            ],
        );

        self.guard(gate, &GateContext::for_scan(&list))?;
        Ok(list)
    }

    /// Write without taking the write lock; the caller holds it.
    pub(crate) fn write_record(
        &self,
        key: &Value,
        record: &Value,
        gate: &Greenlight,
    ) -> StoreResult<()> {
        let path = self.record_path(key);
        let record_string = serde_json::to_string_pretty(record).map_err(|e| {
            StoreError::configuration(format!(
                "record for key {} is not serializable: {}",
                value_string(key),
                e
            ))
        })?;

        self.guard(gate, &GateContext::for_put(key, record, &record_string))?;

        self.backend.write(&path, record_string.as_bytes())?;

        Logger::trace(
            Event::RecordWritten,
            &[
                ("file", path.display().to_string().as_str()),
                ("key", value_string(key).as_str()),
                ("table", self.info.name.as_str()),
            ],
        );
        Ok(())
    }

    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guard(&self, gate: &Greenlight, ctx: &GateContext<'_>) -> StoreResult<()> {
        gate.check(ctx).map_err(|denial| {
            let reason = denial.to_string();
            Logger::trace(
                Event::GateDenied,
                &[
                    ("operation", ctx.operation.as_str()),
                    ("reason", reason.as_str()),
                    ("table", self.info.name.as_str()),
                ],
            );
            StoreError::Denied(denial)
        })
    }
}

fn parse_record(path: &Path, bytes: &[u8]) -> StoreResult<Value> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
