//! Tables for filetable
//!
//! A table is a directory of JSON files, one per record, each named by the
//! hash of its key (see [`crate::naming`]). [`Table`] stores and reads
//! primary records; [`IndexedTable`] adds secondary indexes on top.
//!
//! # Lifecycle
//!
//! - A record is created by its first `put`
//! - Later `put`s with the same key replace it; there are no versions
//! - Tables have no delete
//!
//! # Concurrency
//!
//! Within one process, each table serializes its writes. Across processes
//! nothing is locked: the last writer wins on primary files, and concurrent
//! index updates can lose keys.

mod compare;
mod indexed;
mod info;
mod table;

pub use compare::loosely_equal;
pub use indexed::IndexedTable;
pub use info::{TableInfo, INDEXES_FILE, RESERVED_NAMES, TABLE_INFO_FILE};
pub use table::Table;
