//! Event scripts: the input side of a replay run.
//!
//! A script lives next to the golden files as `{root}/{run_id}.txt`. Each
//! non-blank line that is not a comment (`#` or `//`) is one event group;
//! tokens on a line are comma-separated and decoded with [`decode`].
//!
//! There is no escaping. A literal-text token cannot contain a comma, and a
//! group cannot start with `#` or `//`.

use crate::error::{SnapError, SnapResult};
use crate::event::{decode, KeyEvent};
use gent_core::{CoreError, FileSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Events delivered back to back before the next snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventGroup {
    events: Vec<KeyEvent>,
}

impl EventGroup {
    /// Create a group from decoded events
    #[must_use]
    pub fn new(events: Vec<KeyEvent>) -> Self {
        Self { events }
    }

    /// Decode one script line (without comment handling)
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        Self::new(line.split(',').map(decode).collect())
    }

    /// Events in delivery order
    #[must_use]
    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Number of events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the group has no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Render back to a script line
    #[must_use]
    pub fn to_line(&self) -> String {
        self.events
            .iter()
            .map(KeyEvent::token)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<'a> IntoIterator for &'a EventGroup {
    type Item = &'a KeyEvent;
    type IntoIter = std::slice::Iter<'a, KeyEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Ordered event groups for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    groups: Vec<EventGroup>,
}

impl Script {
    /// Parse script text
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let groups = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !is_skipped(line))
            .map(EventGroup::from_line)
            .collect();
        Self { groups }
    }

    /// Groups in script order
    #[must_use]
    pub fn groups(&self) -> &[EventGroup] {
        &self.groups
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the script has no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total events across all groups
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.groups.iter().map(EventGroup::len).sum()
    }
}

fn is_skipped(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with("//")
}

/// Location of the script for `run_id` under `root`
#[must_use]
pub fn script_path(root: &Path, run_id: &str, extension: &str) -> PathBuf {
    root.join(format!("{}.{}", run_id, extension))
}

/// Load and parse the script for `run_id`
///
/// # Errors
///
/// Returns [`SnapError::ScriptMissing`] if the file does not exist and
/// [`SnapError::ScriptUnreadable`] for any other read failure. Both are
/// fatal for a replay: a test must ship its script.
pub fn load_script(
    fs: &dyn FileSystem,
    root: &Path,
    run_id: &str,
    extension: &str,
) -> SnapResult<Script> {
    let path = script_path(root, run_id, extension);
    let bytes = fs.read_file(&path).map_err(|err| match err {
        CoreError::NotFound { .. } => SnapError::ScriptMissing {
            path: path.display().to_string(),
        },
        source => SnapError::ScriptUnreadable { source },
    })?;
    let script = Script::parse(&String::from_utf8_lossy(&bytes));
    tracing::debug!(
        run_id,
        path = %path.display(),
        groups = script.len(),
        "loaded event script"
    );
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gent_core::{AssertFs, MemFs};

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let script = Script::parse("a,b\n# comment\n\nc");
        assert_eq!(script.len(), 2);
        assert_eq!(script.groups()[0].events(), &[decode("a"), decode("b")]);
        assert_eq!(script.groups()[1].events(), &[decode("c")]);
    }

    #[test]
    fn test_parse_slash_comments_and_whitespace() {
        let script = Script::parse("  // note\n\t down,enter  \r\n   \n#x\ntab\n");
        assert_eq!(script.len(), 2);
        assert_eq!(
            script.groups()[0].events(),
            &[KeyEvent::Down, KeyEvent::Enter]
        );
        assert_eq!(script.groups()[1].events(), &[KeyEvent::Tab]);
    }

    #[test]
    fn test_parse_keeps_token_spacing() {
        let script = Script::parse("a, b");
        assert_eq!(
            script.groups()[0].events(),
            &[decode("a"), KeyEvent::Runes(" b".to_string())]
        );
    }

    #[test]
    fn test_parse_empty_tokens() {
        let script = Script::parse("up,,down");
        assert_eq!(
            script.groups()[0].events(),
            &[KeyEvent::Up, KeyEvent::Runes(String::new()), KeyEvent::Down]
        );
    }

    #[test]
    fn test_parse_empty_script() {
        let script = Script::parse("# only comments\n\n");
        assert!(script.is_empty());
        assert_eq!(script.event_count(), 0);
    }

    #[test]
    fn test_group_to_line() {
        let group = EventGroup::from_line("down,hello,esc");
        assert_eq!(group.to_line(), "down,hello,esc");
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_script_path() {
        assert_eq!(
            script_path(Path::new("testdata/snap"), "run1", "txt"),
            PathBuf::from("testdata/snap/run1.txt")
        );
    }

    #[test]
    fn test_load_script() {
        let fs = MemFs::new();
        AssertFs::new(&fs).write_text_file(Path::new("snap/run1.txt"), "down,enter\ntab\n", "script");

        let script = load_script(&fs, Path::new("snap"), "run1", "txt").unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.event_count(), 3);
    }

    #[test]
    fn test_load_script_missing() {
        let fs = MemFs::new();
        let err = load_script(&fs, Path::new("snap"), "ghost", "txt").unwrap_err();
        assert_eq!(
            err,
            SnapError::ScriptMissing {
                path: "snap/ghost.txt".to_string()
            }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_load_script_unreadable() {
        let fs = MemFs::new();
        AssertFs::new(&fs).mkdir_all(Path::new("snap/run1.txt"), "directory in the way");
        let err = load_script(&fs, Path::new("snap"), "run1", "txt").unwrap_err();
        assert!(matches!(err, SnapError::ScriptUnreadable { .. }));
    }
}
