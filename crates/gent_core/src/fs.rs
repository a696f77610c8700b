//! Filesystem abstraction.
//!
//! The harness only touches the disk through [`FileSystem`], so tests can
//! swap [`OsFs`] for the hermetic [`MemFs`].

use crate::{CoreError, CoreResult};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Minimal filesystem surface used by the snapshot harness
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// Read a whole file
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if the file does not exist and
    /// [`CoreError::Io`] for every other failure
    fn read_file(&self, path: &Path) -> CoreResult<Vec<u8>>;

    /// Write a whole file, replacing any previous content
    ///
    /// Parent directories are not created.
    ///
    /// # Errors
    ///
    /// Returns error if the parent is missing or the write fails
    fn write_file(&self, path: &Path, contents: &[u8]) -> CoreResult<()>;

    /// Create a directory and all missing ancestors
    ///
    /// # Errors
    ///
    /// Returns error if a directory cannot be created
    fn create_dir_all(&self, path: &Path) -> CoreResult<()>;

    /// Whether anything exists at `path`
    ///
    /// # Errors
    ///
    /// Returns error if existence cannot be determined
    fn exists(&self, path: &Path) -> CoreResult<bool>;

    /// Whether a directory exists at `path`
    ///
    /// # Errors
    ///
    /// Returns error if existence cannot be determined
    fn dir_exists(&self, path: &Path) -> CoreResult<bool>;
}

/// The real filesystem via `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn read_file(&self, path: &Path) -> CoreResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| CoreError::from_io(path, &e))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> CoreResult<()> {
        tracing::trace!(path = %path.display(), bytes = contents.len(), "write file");
        std::fs::write(path, contents).map_err(|e| CoreError::from_io(path, &e))
    }

    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        std::fs::create_dir_all(path).map_err(|e| CoreError::from_io(path, &e))
    }

    fn exists(&self, path: &Path) -> CoreResult<bool> {
        path.try_exists().map_err(|e| CoreError::from_io(path, &e))
    }

    fn dir_exists(&self, path: &Path) -> CoreResult<bool> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::from_io(path, &e)),
        }
    }
}

#[derive(Debug, Default)]
struct MemState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

/// In-memory filesystem for hermetic tests
#[derive(Debug, Default)]
pub struct MemFs {
    state: Mutex<MemState>,
}

impl MemFs {
    /// Create an empty in-memory filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of all files, sorted
    #[must_use]
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.lock().files.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// An empty parent ("file" relative to the cwd) and the root always exist.
fn is_implicit_dir(path: &Path) -> bool {
    path.as_os_str().is_empty() || path.parent().is_none()
}

impl MemState {
    fn is_dir(&self, path: &Path) -> bool {
        is_implicit_dir(path) || self.dirs.contains(path)
    }
}

impl FileSystem for MemFs {
    fn read_file(&self, path: &Path) -> CoreResult<Vec<u8>> {
        let state = self.lock();
        if let Some(contents) = state.files.get(path) {
            return Ok(contents.clone());
        }
        if state.is_dir(path) {
            return Err(CoreError::Io {
                path: path.display().to_string(),
                reason: "is a directory".to_string(),
            });
        }
        Err(CoreError::NotFound {
            path: path.display().to_string(),
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> CoreResult<()> {
        let mut state = self.lock();
        if state.is_dir(path) {
            return Err(CoreError::Io {
                path: path.display().to_string(),
                reason: "is a directory".to_string(),
            });
        }
        if let Some(parent) = path.parent() {
            if !state.is_dir(parent) {
                return Err(CoreError::NotFound {
                    path: parent.display().to_string(),
                });
            }
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        let mut state = self.lock();
        for dir in path.ancestors() {
            if is_implicit_dir(dir) {
                continue;
            }
            if state.files.contains_key(dir) {
                return Err(CoreError::Io {
                    path: dir.display().to_string(),
                    reason: "not a directory".to_string(),
                });
            }
            state.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> CoreResult<bool> {
        let state = self.lock();
        Ok(state.files.contains_key(path) || state.is_dir(path))
    }

    fn dir_exists(&self, path: &Path) -> CoreResult<bool> {
        Ok(self.lock().is_dir(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memfs_read_missing_is_not_found() {
        let fs = MemFs::new();
        let err = fs.read_file(Path::new("snap/a")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_memfs_write_requires_parent() {
        let fs = MemFs::new();
        let err = fs.write_file(Path::new("snap/a"), b"x").unwrap_err();
        assert!(err.is_not_found());

        fs.create_dir_all(Path::new("snap")).unwrap();
        fs.write_file(Path::new("snap/a"), b"x").unwrap();
        assert_eq!(fs.read_file(Path::new("snap/a")).unwrap(), b"x");
    }

    #[test]
    fn test_memfs_top_level_file() {
        let fs = MemFs::new();
        fs.write_file(Path::new("top.txt"), b"ok").unwrap();
        assert!(fs.exists(Path::new("top.txt")).unwrap());
        assert!(!fs.dir_exists(Path::new("top.txt")).unwrap());
    }

    #[test]
    fn test_memfs_create_dir_all_makes_ancestors() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("a/b/c")).unwrap();
        assert!(fs.dir_exists(Path::new("a")).unwrap());
        assert!(fs.dir_exists(Path::new("a/b")).unwrap());
        assert!(fs.dir_exists(Path::new("a/b/c")).unwrap());
        assert!(!fs.dir_exists(Path::new("a/x")).unwrap());
    }

    #[test]
    fn test_memfs_read_directory_is_io_error() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("dir")).unwrap();
        let err = fs.read_file(Path::new("dir")).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_memfs_file_paths_sorted() {
        let fs = MemFs::new();
        fs.create_dir_all(Path::new("d")).unwrap();
        fs.write_file(Path::new("d/b"), b"").unwrap();
        fs.write_file(Path::new("d/a"), b"").unwrap();
        assert_eq!(
            fs.file_paths(),
            vec![PathBuf::from("d/a"), PathBuf::from("d/b")]
        );
    }

    #[test]
    fn test_osfs_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let fs = OsFs;
        let dir = tmp.path().join("nested/dir");
        fs.create_dir_all(&dir).unwrap();
        assert!(fs.dir_exists(&dir).unwrap());

        let file = dir.join("golden");
        assert!(!fs.exists(&file).unwrap());
        fs.write_file(&file, "line 1\nline 2".as_bytes()).unwrap();
        assert_eq!(fs.read_file(&file).unwrap(), b"line 1\nline 2");
        assert!(!fs.dir_exists(&file).unwrap());
    }

    #[test]
    fn test_osfs_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = OsFs.read_file(&tmp.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_osfs_write_without_parent_fails() {
        let tmp = TempDir::new().unwrap();
        let result = OsFs.write_file(&tmp.path().join("missing/file"), b"x");
        assert!(result.is_err());
    }
}
