//! Store error types
//!
//! Error codes:
//! - FILETABLE_CONFIGURATION: bad table info, unindexed field, bad gate shape
//! - FILETABLE_NOT_FOUND: no primary record for the key
//! - FILETABLE_CORRUPT: a primary record file is not valid JSON
//! - FILETABLE_DENIED: a greenlight refused the operation
//! - FILETABLE_IO: the backend failed to write or list
//!
//! Index files never produce FILETABLE_CORRUPT; an unreadable index file is
//! read as empty and rewritten on the next change.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::greenlight::Denial;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Record not found for key {key}")]
    NotFound { key: String },

    #[error("Corrupt record at {}: {}", .path.display(), .reason)]
    Corrupt { path: PathBuf, reason: String },

    #[error("Denied: {0}")]
    Denied(Denial),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StoreError {
    pub fn configuration(message: impl Into<String>) -> Self {
        StoreError::Configuration(message.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Configuration(_) => "FILETABLE_CONFIGURATION",
            StoreError::NotFound { .. } => "FILETABLE_NOT_FOUND",
            StoreError::Corrupt { .. } => "FILETABLE_CORRUPT",
            StoreError::Denied(_) => "FILETABLE_DENIED",
            StoreError::Backend(_) => "FILETABLE_IO",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, StoreError::Configuration(_))
    }

    /// The greenlight denial, if this error is one
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            StoreError::Denied(denial) => Some(denial),
            _ => None,
        }
    }
}

impl From<Denial> for StoreError {
    fn from(denial: Denial) -> Self {
        StoreError::Denied(denial)
    }
}
