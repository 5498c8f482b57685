/// A byte range `[start, end)` into the document text.
///
/// Every parsed range stores spans alongside its payload text, so slicing the
/// document with `full` always reproduces the exact markup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when `other` begins exactly where `self` ends.
    #[must_use]
    pub fn touches(self, other: Span) -> bool {
        self.end == other.start
    }

    /// Clamps the span into `text`, snapping both ends down to char boundaries.
    ///
    /// Stale spans (computed against an older revision of the text) never
    /// panic when sliced after clamping; they just select whatever text is
    /// there now.
    #[must_use]
    pub fn clamped(self, text: &str) -> Span {
        let end = floor_char_boundary(text, self.end);
        let start = floor_char_boundary(text, self.start).min(end);
        Span { start, end }
    }

    pub fn as_range(self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span {
            start: r.start,
            end: r.end,
        }
    }
}

/// Largest char boundary in `text` that is `<= offset`.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut i = offset.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(3, 7).len(), 4);
        assert!(Span::new(5, 5).is_empty());
        assert!(Span::new(6, 2).is_empty());
    }

    #[test]
    fn touches_requires_zero_gap() {
        assert!(Span::new(0, 4).touches(Span::new(4, 9)));
        assert!(!Span::new(0, 4).touches(Span::new(5, 9)));
    }

    #[test]
    fn clamped_stays_inside_text() {
        let sp = Span::new(2, 100).clamped("hello");
        assert_eq!(sp, Span::new(2, 5));

        let sp = Span::new(50, 100).clamped("hello");
        assert_eq!(sp, Span::new(5, 5));
    }

    #[test]
    fn clamped_snaps_to_char_boundaries() {
        // "é" is two bytes, offset 2 falls inside it
        let text = "aé b";
        let sp = Span::new(2, 3).clamped(text);
        assert_eq!(sp, Span::new(1, 3));
        assert!(text.get(sp.as_range()).is_some());
    }
}
