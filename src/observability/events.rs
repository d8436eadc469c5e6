//! Observable store events.

use std::fmt;

/// Events the store can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Table constructed from its table info
    TableOpened,
    /// Primary record file written
    RecordWritten,
    /// Primary record file read
    RecordRead,
    /// Full-table scan finished
    TableScanned,
    /// Index file changed by index or deindex
    IndexUpdated,
    /// Index entry names a key whose record cannot be read
    StaleIndexKey,
    /// A greenlight refused an operation
    GateDenied,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::TableOpened => "TABLE_OPENED",
            Event::RecordWritten => "RECORD_WRITTEN",
            Event::RecordRead => "RECORD_READ",
            Event::TableScanned => "TABLE_SCANNED",
            Event::IndexUpdated => "INDEX_UPDATED",
            Event::StaleIndexKey => "STALE_INDEX_KEY",
            Event::GateDenied => "GATE_DENIED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
