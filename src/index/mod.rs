//! Secondary index files for filetable
//!
//! Each indexed field owns a directory. Inside it, every distinct field
//! value maps to one file named by the hash of the value, holding
//! `{ "<base64 of the value>": [key, ...] }`. Keeping the encoded value
//! inside the file lets values whose hashes collide share a file without
//! mixing their keys.
//!
//! # Invariants
//!
//! - Every entry key in a file, base64-decoded, hashes to that file's name
//! - A key appears at most once per entry
//! - Emptied entries are kept as `[]`, never removed
//!
//! Index files are read leniently: a missing or unparsable file reads as
//! empty and is rewritten whole on the next change. Updates are plain
//! read-modify-write with no cross-process locking.

mod ops;
mod record;

pub use ops::{deindex, index};
pub use record::IndexRecord;
