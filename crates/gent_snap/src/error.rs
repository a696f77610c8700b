//! Errors raised by the snapshot harness.

use gent_core::CoreError;

/// Snapshot harness result type
pub type SnapResult<T> = Result<T, SnapError>;

/// Snapshot harness error
///
/// Every variant is a setup or environment failure. A rendered view that
/// differs from its golden file is never reported here; that is the job of
/// the caller's verify function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapError {
    /// The event script for a run does not exist
    #[error("event script missing: {path}")]
    ScriptMissing {
        /// Expected script location
        path: String,
    },

    /// The event script exists but could not be read
    #[error("event script unreadable: {source}")]
    ScriptUnreadable {
        /// Underlying filesystem error
        source: CoreError,
    },

    /// An effect chain kept producing events past the settle limit
    #[error("effect chain did not settle after {iterations} iterations")]
    NonConvergent {
        /// Number of effect-driven updates applied before giving up
        iterations: usize,
    },

    /// Reading or writing a golden file failed
    #[error("snapshot {name}: {source}")]
    Store {
        /// Snapshot name
        name: String,
        /// Underlying filesystem error
        source: CoreError,
    },

    /// The same snapshot name was taken twice within one run
    #[error("snapshot {name} taken twice in one run")]
    DuplicateSnapshot {
        /// Snapshot name
        name: String,
    },
}

impl SnapError {
    /// Whether the harness must abort instead of carrying on
    ///
    /// All current variants are fatal; the method exists so callers that
    /// collect errors do not have to match on every variant.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::ScriptMissing { .. }
            | Self::ScriptUnreadable { .. }
            | Self::NonConvergent { .. }
            | Self::Store { .. }
            | Self::DuplicateSnapshot { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SnapError::ScriptMissing {
            path: "testdata/run1.txt".to_string(),
        };
        assert_eq!(err.to_string(), "event script missing: testdata/run1.txt");

        let err = SnapError::NonConvergent { iterations: 100 };
        assert_eq!(
            err.to_string(),
            "effect chain did not settle after 100 iterations"
        );
    }

    #[test]
    fn test_store_error_names_snapshot() {
        let err = SnapError::Store {
            name: "run1_000".to_string(),
            source: CoreError::Io {
                path: "snap/run1_000".to_string(),
                reason: "disk full".to_string(),
            },
        };
        let s = err.to_string();
        assert!(s.contains("run1_000"));
        assert!(s.contains("disk full"));
        assert!(err.is_fatal());
    }
}
