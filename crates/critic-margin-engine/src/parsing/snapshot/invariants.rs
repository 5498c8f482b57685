use crate::parsing::{markup::MarkupRange, threads::CommentThread};

/// Validates parser output invariants.
///
/// Asserts that:
/// - Every span is within text bounds
/// - `full.start <= inner.start <= inner.end <= full.end`
/// - `content` equals the text under `inner`
/// - Ranges ascend and never overlap
/// - Thread members are comments and touch with zero gap
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(text: &str, ranges: &[MarkupRange], threads: &[CommentThread]) {
    let n = text.len();
    for r in ranges {
        assert!(
            r.full.start <= r.full.end && r.full.end <= n,
            "range span out of bounds: {:?} (text len: {})",
            r.full,
            n
        );
        assert!(
            r.full.start <= r.inner.start && r.inner.start <= r.inner.end && r.inner.end <= r.full.end,
            "inner span not contained in range span: inner {:?}, full {:?}",
            r.inner,
            r.full
        );
        assert_eq!(
            &text[r.inner.start..r.inner.end],
            r.content,
            "content does not match text under inner span {:?}",
            r.inner
        );
    }

    for pair in ranges.windows(2) {
        assert!(
            pair[0].full.end <= pair[1].full.start,
            "ranges overlap or are out of order: {:?} then {:?}",
            pair[0].full,
            pair[1].full
        );
    }

    for thread in threads {
        assert!(!thread.is_empty(), "empty thread");
        assert!(
            thread.comments.iter().all(MarkupRange::is_comment),
            "non-comment in thread at {}",
            thread.from()
        );
        for pair in thread.comments.windows(2) {
            assert!(
                pair[0].full.touches(pair[1].full),
                "gap inside thread: {:?} then {:?}",
                pair[0].full,
                pair[1].full
            );
        }
    }

    for pair in threads.windows(2) {
        assert!(
            pair[0].to() < pair[1].from(),
            "threads touch or overlap: {:?} then {:?}",
            pair[0].span(),
            pair[1].span()
        );
    }
}
