//! Text sanitization for decoded post content.
//!
//! Two passes make text safe to re-encode and display:
//!
//! 1. unpaired UTF-16 surrogates become [`REPLACEMENT`], one for one;
//! 2. C0 control characters other than tab, line feed and carriage return
//!    become [`REPLACEMENT`].
//!
//! A Rust `str` can never hold an unpaired surrogate, so pass 1 only has work
//! to do on wide (UTF-16) input, see [`sanitize_utf16`]. Both entry points are
//! idempotent.

use std::borrow::Cow;

/// The visible stand-in for anything that cannot be shown safely.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Returns true for C0 controls that must not reach the output.
fn is_disallowed_control(c: char) -> bool {
    c <= '\u{1F}' && !matches!(c, '\t' | '\n' | '\r')
}

/// Replaces disallowed control characters in `text`.
///
/// Borrows when nothing needs replacing, which is the common case for
/// real thread pages.
///
/// # Example
///
/// ```rust
/// use aaview_core::sanitize::sanitize;
///
/// assert_eq!(sanitize("a\u{0}b\tc\n"), "a\u{FFFD}b\tc\n");
/// ```
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_disallowed_control) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(
        text.chars()
            .map(|c| if is_disallowed_control(c) { REPLACEMENT } else { c })
            .collect(),
    )
}

/// Decodes UTF-16 code units and sanitizes the result.
///
/// Each unpaired surrogate unit becomes exactly one [`REPLACEMENT`], so
/// a run of two high surrogates yields two replacement characters.
pub fn sanitize_utf16(units: &[u16]) -> String {
    let text: String = char::decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(REPLACEMENT))
        .collect();

    match sanitize(&text) {
        Cow::Borrowed(_) => text,
        Cow::Owned(cleaned) => cleaned,
    }
}

/// Folds `\r\n` and lone `\r` into `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
