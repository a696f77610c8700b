//! Golden files: read, write and verify rendered views.

use crate::error::{SnapError, SnapResult};
use gent_core::{CoreError, FileSystem, OsFs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable that switches snapshot runs to [`SnapshotMode::Record`]
pub const UPDATE_ENV_VAR: &str = "GENT_UPDATE_SNAPSHOTS";

/// Equality assertion supplied by the test: `(expected, actual, name)`
///
/// It should register a test failure when `expected != actual`. The harness
/// never inspects its outcome.
pub type VerifyFn<'a> = &'a dyn Fn(&str, &str, &str);

/// How a snapshot treats existing golden content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// Overwrite the golden file whenever the view differs
    Record,
    /// Assert against existing content; record only if there is none
    Verify,
}

impl SnapshotMode {
    /// `true` maps to [`SnapshotMode::Verify`]
    #[must_use]
    pub fn from_verify(verify: bool) -> Self {
        if verify {
            Self::Verify
        } else {
            Self::Record
        }
    }

    /// Read [`UPDATE_ENV_VAR`]; unset or unrecognised means verify
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(UPDATE_ENV_VAR).ok().as_deref())
    }

    /// Interpret a raw [`UPDATE_ENV_VAR`] value
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => Self::Record,
            _ => Self::Verify,
        }
    }

    /// Whether existing content is asserted against
    #[must_use]
    pub fn is_verify(self) -> bool {
        self == Self::Verify
    }
}

impl Default for SnapshotMode {
    fn default() -> Self {
        Self::Verify
    }
}

impl fmt::Display for SnapshotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => write!(f, "record"),
            Self::Verify => write!(f, "verify"),
        }
    }
}

/// What [`Snapshot::run`] did with the golden file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Existing content was handed to the verify function
    Verified,
    /// No content existed; the view became the baseline
    Recorded,
    /// Content differed and was overwritten
    Updated,
    /// Content already matched; nothing written
    Unchanged,
}

/// Lifecycle state of a golden file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotState {
    /// No file exists yet
    Absent,
    /// The file exists but holds nothing; verify mode will record over it
    Empty,
    /// The file holds a baseline
    Recorded,
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Empty => write!(f, "empty"),
            Self::Recorded => write!(f, "recorded"),
        }
    }
}

/// A directory of golden files
///
/// Snapshot paths are `root.join(name)`, so the same name always resolves to
/// the same file.
#[derive(Debug, Clone)]
pub struct SnapshotSuite {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl SnapshotSuite {
    /// Create a suite on the real filesystem, usually under `testdata`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_fs(root, Arc::new(OsFs))
    }

    /// Create a suite on a custom filesystem
    #[must_use]
    pub fn with_fs(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem the suite reads and writes through
    #[must_use]
    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Path of the golden file for `name`
    #[must_use]
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Inspect the golden file for `name` without touching it
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::Store`] on any failure other than the file not
    /// existing
    pub fn state(&self, name: &str) -> SnapResult<SnapshotState> {
        match self.fs.read_file(&self.snapshot_path(name)) {
            Ok(bytes) if bytes.is_empty() => Ok(SnapshotState::Empty),
            Ok(_) => Ok(SnapshotState::Recorded),
            Err(CoreError::NotFound { .. }) => Ok(SnapshotState::Absent),
            Err(source) => Err(SnapError::Store {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Create a snapshot handle
    ///
    /// With [`SnapshotMode::Record`] the golden file is rewritten and tests
    /// never fail. With [`SnapshotMode::Verify`] an empty or missing file is
    /// recorded, and existing content goes through `equal`.
    #[must_use]
    pub fn new_snapshot<'a>(
        &'a self,
        name: &str,
        mode: SnapshotMode,
        equal: VerifyFn<'a>,
    ) -> Snapshot<'a> {
        Snapshot {
            name: name.to_string(),
            path: self.snapshot_path(name),
            mode,
            fs: self.fs.as_ref(),
            equal,
        }
    }
}

/// One golden file check
pub struct Snapshot<'a> {
    name: String,
    path: PathBuf,
    mode: SnapshotMode,
    fs: &'a dyn FileSystem,
    equal: VerifyFn<'a>,
}

impl fmt::Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Snapshot<'_> {
    /// Snapshot name, also the last path component
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Golden file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current golden content; a missing file reads as empty
    ///
    /// # Errors
    ///
    /// Returns error on any failure other than the file not existing
    pub fn stored(&self) -> SnapResult<String> {
        match self.fs.read_file(&self.path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(CoreError::NotFound { .. }) => Ok(String::new()),
            Err(source) => Err(self.store_error(source)),
        }
    }

    /// Check `view` against the golden file
    ///
    /// Only unexpected filesystem failures are errors. A mismatch in verify
    /// mode is reported by the verify function and still returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`SnapError::Store`] if the golden file cannot be read or
    /// written
    pub fn run(&self, view: &str) -> SnapResult<SnapshotOutcome> {
        let stored = self.stored()?;

        if self.mode.is_verify() && !stored.is_empty() {
            tracing::debug!(name = %self.name, "verifying snapshot");
            (self.equal)(&stored, view, &self.name);
            return Ok(SnapshotOutcome::Verified);
        }

        if view == stored {
            return Ok(SnapshotOutcome::Unchanged);
        }

        self.write(view)?;
        let outcome = if stored.is_empty() {
            SnapshotOutcome::Recorded
        } else {
            SnapshotOutcome::Updated
        };
        tracing::info!(
            name = %self.name,
            mode = %self.mode,
            outcome = ?outcome,
            "wrote snapshot"
        );
        Ok(outcome)
    }

    fn write(&self, content: &str) -> SnapResult<()> {
        if let Some(parent) = self.path.parent() {
            self.fs
                .create_dir_all(parent)
                .map_err(|source| self.store_error(source))?;
        }
        self.fs
            .write_file(&self.path, content.as_bytes())
            .map_err(|source| self.store_error(source))
    }

    fn store_error(&self, source: CoreError) -> SnapError {
        SnapError::Store {
            name: self.name.clone(),
            source,
        }
    }
}
