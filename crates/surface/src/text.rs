//! UTF-8 offset helpers used by the editing primitives.

/// Clamp an arbitrary byte index to a valid UTF-8 character boundary.
///
/// If `index` is beyond the string length, it is clamped to `s.len()`.
/// If `index` falls in the middle of a multi-byte character, it is
/// adjusted backwards to the start of that character.
///
/// ```
/// use surface::clamp_to_char_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Find the previous character boundary before `i`; 0 if already at the start.
///
/// ```
/// use surface::prev_char_boundary;
///
/// let s = "a€b";
/// assert_eq!(prev_char_boundary(s, 4), 1);
/// assert_eq!(prev_char_boundary(s, 0), 0);
/// ```
pub fn prev_char_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    if i == 0 {
        return 0;
    }
    s[..i]
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Escape text for inclusion in HTML text or a double-quoted attribute value.
///
/// ```
/// use surface::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("some@valid.email"), "some@valid.email");
    }

    #[test]
    fn prev_boundary_steps_over_multibyte() {
        let s = "€€";
        assert_eq!(prev_char_boundary(s, s.len()), 3);
        assert_eq!(prev_char_boundary(s, 3), 0);
    }
}
