//! Filesystem operations that panic with context instead of returning errors.
//!
//! Meant for test fixtures: every call carries a `message` that ends up in the
//! panic text so a failing setup step is easy to attribute.

use crate::{CoreResult, FileSystem};
use std::path::Path;

/// Filesystem operations with assertions
#[derive(Debug, Clone, Copy)]
pub struct AssertFs<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> AssertFs<'a> {
    /// Wrap a filesystem
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Write a text file, creating its parent directories first
    pub fn write_text_file(&self, path: &Path, content: &str, message: &str) {
        if let Some(parent) = path.parent() {
            self.mkdir_all(parent, message);
        }
        if let Err(err) = self.fs.write_file(path, content.as_bytes()) {
            panic!(
                "write, path: {}, message: {}, error: {}",
                path.display(),
                message,
                err
            );
        }
    }

    /// Create a directory and its ancestors
    pub fn mkdir_all(&self, path: &Path, message: &str) {
        if let Err(err) = self.fs.create_dir_all(path) {
            panic!(
                "mkdir, path: {}, message: {}, error: {}",
                path.display(),
                message,
                err
            );
        }
    }

    /// Assert that a directory exists
    pub fn dir_exists(&self, path: &Path, message: &str) {
        match self.fs.dir_exists(path) {
            Ok(exists) => assert!(
                exists,
                "dir exists, path: {}, message: {}",
                path.display(),
                message
            ),
            Err(err) => panic!(
                "dir exists, err, path: {}, message: {}, error: {}",
                path.display(),
                message,
                err
            ),
        }
    }

    /// Assert that something exists at `path`
    pub fn exists(&self, path: &Path, message: &str) {
        self.check_exists(path, message, true);
    }

    /// Assert that nothing exists at `path`
    pub fn not_exists(&self, path: &Path, message: &str) {
        self.check_exists(path, message, false);
    }

    fn check_exists(&self, path: &Path, message: &str, should_exist: bool) {
        match self.fs.exists(path) {
            Ok(exists) => assert_eq!(
                should_exist,
                exists,
                "exists, path: {}, message: {}",
                path.display(),
                message
            ),
            Err(err) => panic!(
                "exists, path: {}, message: {}, error: {}",
                path.display(),
                message,
                err
            ),
        }
    }

    /// Read a file as lines split on `\n`; an empty file yields no lines
    pub fn read_lines(&self, path: &Path, message: &str) -> Vec<String> {
        let bytes = match self.fs.read_file(path) {
            Ok(bytes) => bytes,
            Err(err) => panic!(
                "read lines, path: {}, message: {}, error: {}",
                path.display(),
                message,
                err
            ),
        };
        if bytes.is_empty() {
            return Vec::new();
        }
        String::from_utf8_lossy(&bytes)
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// Assert that a file holds exactly `content`
    pub fn contains(&self, path: &Path, content: &str, message: &str) {
        let actual = self.read_lines(path, message).join("\n");
        assert_eq!(
            content,
            actual,
            "contains, path: {}, message: {}",
            path.display(),
            message
        );
    }

    /// Write raw bytes without asserting
    ///
    /// # Errors
    ///
    /// Returns the underlying filesystem error
    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> CoreResult<()> {
        self.fs.write_file(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemFs;

    #[test]
    fn test_write_text_file_creates_dirs() {
        let fs = MemFs::new();
        let afs = AssertFs::new(&fs);
        afs.write_text_file(Path::new("a/b/c.txt"), "hi\nthere", "setup");
        afs.dir_exists(Path::new("a/b"), "parent");
        afs.exists(Path::new("a/b/c.txt"), "file");
        afs.contains(Path::new("a/b/c.txt"), "hi\nthere", "content");
    }

    #[test]
    fn test_read_lines() {
        let fs = MemFs::new();
        let afs = AssertFs::new(&fs);
        afs.write_text_file(Path::new("d/empty"), "", "empty");
        afs.write_text_file(Path::new("d/two"), "x\ny\n", "two");
        assert!(afs.read_lines(Path::new("d/empty"), "empty").is_empty());
        assert_eq!(afs.read_lines(Path::new("d/two"), "two"), vec!["x", "y", ""]);
    }

    #[test]
    fn test_not_exists() {
        let fs = MemFs::new();
        AssertFs::new(&fs).not_exists(Path::new("ghost"), "absent");
    }

    #[test]
    #[should_panic(expected = "message: fixture")]
    fn test_exists_panics_with_message() {
        let fs = MemFs::new();
        AssertFs::new(&fs).exists(Path::new("ghost"), "fixture");
    }

    #[test]
    fn test_write_bytes_reports_error() {
        let fs = MemFs::new();
        let afs = AssertFs::new(&fs);
        assert!(afs.write_bytes(Path::new("no/parent"), b"x").is_err());
    }
}
