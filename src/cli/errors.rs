//! CLI error types

use std::io;

use thiserror::Error;

use crate::errors::StoreError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Stable error code; store errors keep their own
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Store(err) => err.code(),
            CliError::Io(_) => "FILETABLE_CLI_IO",
            CliError::InvalidInput(_) => "FILETABLE_CLI_INPUT",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::InvalidInput(err.to_string())
    }
}
