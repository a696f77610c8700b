//! Core error types for gent.

use std::io;
use std::path::Path;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// File or directory does not exist
    #[error("not found: {path}")]
    NotFound {
        /// Path that was looked up
        path: String,
    },

    /// Any other I/O failure
    #[error("IO error at {path}: {reason}")]
    Io {
        /// Path the operation touched
        path: String,
        /// Underlying error message
        reason: String,
    },
}

impl CoreError {
    /// Classify an [`io::Error`] raised while touching `path`
    #[must_use]
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.display().to_string();
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io {
                path,
                reason: err.to_string(),
            }
        }
    }

    /// Whether this error means the path simply does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
