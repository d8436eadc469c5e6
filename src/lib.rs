//! filetable - an embedded record store built from hashed JSON files
//!
//! - [`table::Table`]: one JSON file per record, named by the hash of its key
//! - [`table::IndexedTable`]: a table plus per-field reverse indexes
//! - [`greenlight`]: caller-supplied allow/deny gates around every operation
//! - [`backend`]: the byte store underneath (filesystem or memory)
//!
//! ```ignore
//! use filetable::{Greenlight, IndexedTable, TableInfo};
//! use serde_json::json;
//!
//! let info = TableInfo::new("/data/tickets", "tickets").with_index("status", "/data/idx/status");
//! let table = IndexedTable::open(info)?;
//! table.put(&json!("a"), &json!({"status": "open"}), &Greenlight::None)?;
//! let keys = table.get_all_matching_keys_from_index("status", &json!("open"))?;
//! ```

pub mod backend;
pub mod cli;
pub mod errors;
pub mod greenlight;
pub mod index;
pub mod naming;
pub mod observability;
pub mod table;

pub use errors::{StoreError, StoreResult};
pub use greenlight::{Greenlight, GreenlightRegistry};
pub use table::{IndexedTable, Table, TableInfo};
