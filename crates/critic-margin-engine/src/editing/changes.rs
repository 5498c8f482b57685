//! Accept / reject of a single markup range.
//!
//! | Kind | accept | reject |
//! |---|---|---|
//! | addition | keep content | drop token |
//! | deletion | drop token | keep content |
//! | substitution | keep new | keep old |
//! | highlight | keep content | keep content |
//! | comment | drop token | drop token |

use log::debug;

use crate::parsing::{
    markup::{MarkupKind, MarkupRange, parse_markup},
    rope::Span,
};

/// What the reviewer decided about a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accept,
    Reject,
}

/// The text that takes the place of `range.full` for `outcome`.
pub fn replacement(range: &MarkupRange, outcome: Outcome) -> &str {
    match (&range.kind, outcome) {
        (MarkupKind::Addition, Outcome::Accept) => &range.content,
        (MarkupKind::Addition, Outcome::Reject) => "",
        (MarkupKind::Deletion, Outcome::Accept) => "",
        (MarkupKind::Deletion, Outcome::Reject) => &range.content,
        (MarkupKind::Substitution { new, .. }, Outcome::Accept) => new,
        (MarkupKind::Substitution { old, .. }, Outcome::Reject) => old,
        (MarkupKind::Highlight, _) => &range.content,
        (MarkupKind::Comment { .. }, _) => "",
    }
}

/// Rewrites `text` by resolving `range`.
///
/// Text before `range.full.start` and from `range.full.end` on is kept
/// verbatim. Offsets are not re-validated: callers in a live editing context
/// must re-parse right before applying. A stale span is clamped into the
/// text, so the result is well-formed but its content is unspecified.
pub fn apply_change(text: &str, range: &MarkupRange, outcome: Outcome) -> String {
    let sp = range.full.clamped(text);
    splice(text, sp, replacement(range, outcome))
}

/// Resolves every range in `text` the same way (accept all / reject all).
pub fn apply_all(text: &str, outcome: Outcome) -> String {
    let ranges = parse_markup(text);
    debug!("resolving {} ranges with {outcome:?}", ranges.len());

    let mut out = text.to_string();
    // Back to front so earlier offsets stay valid.
    for range in ranges.iter().rev() {
        out.replace_range(range.full.as_range(), replacement(range, outcome));
    }
    out
}

fn splice(text: &str, sp: Span, with: &str) -> String {
    let mut out = String::with_capacity(text.len() - sp.len() + with.len());
    out.push_str(&text[..sp.start]);
    out.push_str(with);
    out.push_str(&text[sp.end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn first(text: &str) -> MarkupRange {
        parse_markup(text).into_iter().next().expect("a range")
    }

    #[rstest]
    #[case("a {++new++} b", "a new b", "a  b")]
    #[case("a {--old--} b", "a  b", "a old b")]
    #[case("a {~~old~>new~~} b", "a new b", "a old b")]
    #[case("a {==hi==} b", "a hi b", "a hi b")]
    #[case("a {>>note<<} b", "a  b", "a  b")]
    #[case(
        r#"a {>>{"author":"x","timestamp":1}@@note<<} b"#,
        "a  b",
        "a  b"
    )]
    fn resolution_table(#[case] text: &str, #[case] accepted: &str, #[case] rejected: &str) {
        let range = first(text);
        assert_eq!(apply_change(text, &range, Outcome::Accept), accepted);
        assert_eq!(apply_change(text, &range, Outcome::Reject), rejected);
    }

    #[test]
    fn addition_accept_equals_span_replaced_by_content() {
        let doc = "pre {++mid++} post";
        let r = first(doc);
        let expected = format!(
            "{}{}{}",
            &doc[..r.full.start],
            r.content,
            &doc[r.full.end..]
        );
        assert_eq!(apply_change(doc, &r, Outcome::Accept), expected);
    }

    #[test]
    fn surrounding_text_is_untouched() {
        let doc = "é {++x++} ü {>>keep<<}";
        let r = first(doc);
        let out = apply_change(doc, &r, Outcome::Accept);
        assert_eq!(out, "é x ü {>>keep<<}");
    }

    #[test]
    fn substitution_with_empty_halves() {
        let doc = "{~~~>added~~}";
        let r = first(doc);
        assert_eq!(apply_change(doc, &r, Outcome::Accept), "added");
        assert_eq!(apply_change(doc, &r, Outcome::Reject), "");
    }

    #[test]
    fn stale_range_does_not_panic() {
        let range = first("long prefix text {++x++}");
        let out = apply_change("short", &range, Outcome::Accept);
        assert_eq!(out, "shortx");
    }

    #[test]
    fn accept_all_resolves_everything() {
        let doc = "A{++b++}{--c--}{~~d~>e~~}{==f==}{>>g<<}{>>h<<}";
        assert_eq!(apply_all(doc, Outcome::Accept), "Abef");
        assert_eq!(apply_all(doc, Outcome::Reject), "Acdf");
    }

    #[test]
    fn apply_all_leaves_broken_markup() {
        let doc = "{++ok++} {--broken";
        assert_eq!(apply_all(doc, Outcome::Accept), "ok {--broken");
    }

    #[test]
    fn apply_all_output_has_no_markup_left() {
        let doc = "x {++a++} y {>>b<<}{>>c<<} z";
        for outcome in [Outcome::Accept, Outcome::Reject] {
            assert!(parse_markup(&apply_all(doc, outcome)).is_empty());
        }
    }
}
