//! # Backend Errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {}", .path.display(), .message)]
    Io { path: PathBuf, message: String },
}

impl BackendError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BackendError::NotFound(path.to_path_buf())
        } else {
            BackendError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    }

    /// Whether the failure means the file is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}
