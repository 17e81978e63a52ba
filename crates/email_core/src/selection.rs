//! Token-index selection representation.

/// A cursor or selection expressed in token-index space.
///
/// `start` and `end` count tokens, not characters: a collapsed range at `k`
/// sits between token `k - 1` and token `k`. The range is always normalized
/// such that `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRange {
    /// Index of the first selected token (inclusive).
    pub start: usize,
    /// Index one past the last selected token (exclusive).
    pub end: usize,
}

impl SelectionRange {
    /// Create a new selection range.
    ///
    /// The range is automatically normalized so `start <= end`.
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed cursor at token boundary `at`.
    #[inline]
    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// Returns `true` if the selection is a cursor (zero-width).
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Returns the selected tokens, clamped to the slice.
    #[inline]
    pub fn slice<'a, T>(&self, tokens: &'a [T]) -> &'a [T] {
        let end = self.end.min(tokens.len());
        let start = self.start.min(end);
        &tokens[start..end]
    }

    /// Token range a Backspace at this selection deletes.
    ///
    /// A collapsed cursor deletes the token before it (nothing at index 0);
    /// a ranged selection deletes exactly the spanned tokens.
    pub fn backspace_target(&self) -> Option<SelectionRange> {
        if self.is_collapsed() {
            let start = self.start.checked_sub(1)?;
            return Some(SelectionRange::new(start, self.start));
        }
        Some(*self)
    }
}
