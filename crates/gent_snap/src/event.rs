//! Script tokens decoded into key events.

use crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key input delivered to a component during replay
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEvent {
    /// Enter / return
    Enter,
    /// Tab
    Tab,
    /// Escape
    Esc,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Literal text typed as a single input event
    Runes(String),
}

impl KeyEvent {
    /// Script token for this event
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Enter => "enter",
            Self::Tab => "tab",
            Self::Esc => "esc",
            Self::Up => "up",
            Self::Down => "down",
            Self::Runes(text) => text,
        }
    }

    /// Whether this is one of the named control keys
    #[must_use]
    pub fn is_control(&self) -> bool {
        !matches!(self, Self::Runes(_))
    }

    /// Equivalent crossterm key events
    ///
    /// Control keys map to one event; literal text maps to one
    /// `KeyCode::Char` per character.
    #[must_use]
    pub fn to_crossterm(&self) -> Vec<crossterm::event::KeyEvent> {
        let plain = |code| crossterm::event::KeyEvent::new(code, KeyModifiers::empty());
        match self {
            Self::Enter => vec![plain(KeyCode::Enter)],
            Self::Tab => vec![plain(KeyCode::Tab)],
            Self::Esc => vec![plain(KeyCode::Esc)],
            Self::Up => vec![plain(KeyCode::Up)],
            Self::Down => vec![plain(KeyCode::Down)],
            Self::Runes(text) => text.chars().map(|c| plain(KeyCode::Char(c))).collect(),
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Decode a script token
///
/// `enter`, `tab`, `esc`, `up` and `down` (exact, case-sensitive) are
/// control keys. Every other token, the empty string included, is literal
/// text. Decoding never fails.
#[must_use]
pub fn decode(token: &str) -> KeyEvent {
    match token {
        "enter" => KeyEvent::Enter,
        "tab" => KeyEvent::Tab,
        "esc" => KeyEvent::Esc,
        "up" => KeyEvent::Up,
        "down" => KeyEvent::Down,
        other => KeyEvent::Runes(other.to_string()),
    }
}
