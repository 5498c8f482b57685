use crate::parsing::rope::Span;

/// A cursor for byte-by-byte markup scanning with position tracking.
///
/// Operates over a string slice while tracking the absolute byte position
/// in the document (via `base` offset).
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Base offset in the document (added to local index for absolute positions).
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s` with the given base offset.
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Returns the current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Checks if the remaining input starts with the given delimiter.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.s
            .as_bytes()
            .get(self.i..)
            .is_some_and(|rest| rest.starts_with(pat.as_bytes()))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.s.as_bytes().get(self.i).copied()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Returns the text under an absolute span.
    ///
    /// Callers only pass spans whose ends sit next to ASCII delimiters, so
    /// both ends are always char boundaries.
    pub fn text(&self, sp: Span) -> &'a str {
        &self.s[sp.start - self.base..sp.end - self.base]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello", 10);
        assert_eq!(cur.pos(), 10);
        assert!(!cur.eof());
        assert_eq!(cur.bump(), Some(b'h'));
        assert_eq!(cur.pos(), 11);
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("{++new++}", 0);
        assert!(cur.starts_with("{++"));
        assert!(!cur.starts_with("{--"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("", 0);
        assert!(cur.eof());
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn starts_with_pattern_longer_than_remaining() {
        let mut cur = Cursor::new("{+", 0);
        assert!(!cur.starts_with("{++"));

        cur.bump();
        assert!(!cur.starts_with("++"));
        assert!(cur.starts_with("+"));
    }

    #[test]
    fn starts_with_past_end_is_false() {
        // bump_n does not bounds check; caller must ensure validity
        let mut cur = Cursor::new("ab", 0);
        cur.bump_n(10);
        assert!(cur.eof());
        assert!(!cur.starts_with("a"));
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x", 0);
        assert_eq!(cur.bump(), Some(b'x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn text_uses_absolute_spans() {
        let cur = Cursor::new("say {++hi++}", 100);
        assert_eq!(cur.text(Span::new(107, 109)), "hi");
    }
}
