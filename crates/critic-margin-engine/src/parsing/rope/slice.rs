use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
///
/// This allocates; prefer working with spans where possible.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    let end = sp.end.min(rope.len());
    let start = sp.start.min(end);
    rope.slice_to_cow(start..end).into_owned()
}

/// Truncates `s` to at most `max` bytes with a "..." suffix if needed.
///
/// Used for human-readable snapshot output and margin card previews.
pub fn preview(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = super::span::floor_char_boundary(s, max);
    let mut out = s[..cut].to_string();
    out.push_str("...");
    out
}
