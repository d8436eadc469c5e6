//! What a gate gets to see.

use std::fmt;

use serde_json::Value;

/// The table operation a gate is guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Put,
    Get,
    Scan,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Put => "put",
            Operation::Get => "get",
            Operation::Scan => "scan",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation context handed to every evaluator.
///
/// - put: `key`, `record` and `record_string` (the exact text about to be written)
/// - get: `key` and `record` (already read from disk)
/// - scan: `list` only
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub operation: Operation,
    pub key: Option<&'a Value>,
    pub record: Option<&'a Value>,
    pub record_string: &'a str,
    pub list: Option<&'a [Value]>,
}

impl<'a> GateContext<'a> {
    pub fn for_put(key: &'a Value, record: &'a Value, record_string: &'a str) -> Self {
        Self {
            operation: Operation::Put,
            key: Some(key),
            record: Some(record),
            record_string,
            list: None,
        }
    }

    pub fn for_get(key: &'a Value, record: &'a Value) -> Self {
        Self {
            operation: Operation::Get,
            key: Some(key),
            record: Some(record),
            record_string: "",
            list: None,
        }
    }

    pub fn for_scan(list: &'a [Value]) -> Self {
        Self {
            operation: Operation::Scan,
            key: None,
            record: None,
            record_string: "",
            list: Some(list),
        }
    }
}
