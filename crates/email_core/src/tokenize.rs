//! Splitting raw text into email tokens.

use std::borrow::Cow;

/// Characters that end a token: any whitespace, or a comma.
#[inline]
pub fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == ','
}

/// Returns `true` if `text` contains at least one separator character.
///
/// ```
/// use email_core::has_separator;
///
/// assert!(has_separator("a@b.com "));
/// assert!(has_separator("a,b"));
/// assert!(!has_separator("a@b.com"));
/// ```
#[inline]
pub fn has_separator(text: &str) -> bool {
    text.chars().any(is_separator)
}

/// Split raw text on runs of whitespace and commas, discarding empty pieces.
///
/// Idempotent: re-tokenizing the space-joined output yields the same tokens.
///
/// ```
/// use email_core::tokenize;
///
/// assert_eq!(tokenize(" a@b.com,, c \n d "), vec!["a@b.com", "c", "d"]);
/// assert!(tokenize(" ,\t").is_empty());
/// ```
pub fn tokenize(raw: &str) -> Vec<String> {
    tokens(raw).map(str::to_owned).collect()
}

/// Borrowing variant of [`tokenize`].
pub fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(is_separator).filter(|t| !t.is_empty())
}

/// Collapse every whitespace run into a single ASCII space.
///
/// Returns `Cow::Borrowed` when nothing needs to change. Commas are kept, so
/// the text still tokenizes the same way.
///
/// ```
/// use email_core::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("a\r\n\tb  c"), "a b c");
/// assert_eq!(collapse_whitespace("a b"), "a b");
/// ```
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let mut prev_ws = false;
    let needs_work = text.chars().any(|ch| {
        let ws = ch.is_whitespace();
        let bad = ws && (prev_ws || ch != ' ');
        prev_ws = ws;
        bad
    });
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    Cow::Owned(out)
}
