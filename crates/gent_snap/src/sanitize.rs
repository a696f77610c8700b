//! Filesystem-safe snapshot names.

use once_cell::sync::Lazy;
use regex::Regex;

// Literal pattern, cannot fail to compile.
static UNSAFE_FILENAME_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-zA-Z._-]").expect("valid filename pattern"));

/// Replace every character outside `[0-9A-Za-z._-]` with `_`
///
/// Replacement is one-for-one, so the result has as many characters as the
/// input and runs of unsafe characters are not collapsed.
#[must_use]
pub fn sanitize(name: &str) -> String {
    UNSAFE_FILENAME_CHAR.replace_all(name, "_").into_owned()
}

/// Whether `c` survives [`sanitize`] unchanged
#[must_use]
pub fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_')
}
