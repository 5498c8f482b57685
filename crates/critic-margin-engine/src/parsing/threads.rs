use crate::parsing::{markup::MarkupRange, rope::Span};

/// A maximal run of comments with no characters between them.
///
/// The first comment is the root; the rest are replies in document order.
/// Membership is purely positional: a reply joins a thread because it was
/// inserted exactly at the thread's end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    /// Never empty.
    pub comments: Vec<MarkupRange>,
}

impl CommentThread {
    pub fn root(&self) -> &MarkupRange {
        &self.comments[0]
    }

    pub fn replies(&self) -> &[MarkupRange] {
        &self.comments[1..]
    }

    /// Start of the root comment. Also the key for cached card heights.
    pub fn from(&self) -> usize {
        self.root().full.start
    }

    /// End of the last comment; where a reply must be inserted.
    pub fn to(&self) -> usize {
        self.comments.last().map_or(self.from(), |c| c.full.end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.from(), self.to())
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Groups comment ranges into threads.
///
/// Non-comment ranges are skipped. `ranges` must ascend by `full.start`, as
/// [`parse_markup`](crate::parsing::markup::parse_markup) guarantees. A comment
/// starting exactly at the running thread's end joins it; any gap, even a
/// single space, starts a new thread.
pub fn group_threads(ranges: &[MarkupRange]) -> Vec<CommentThread> {
    let mut threads: Vec<CommentThread> = Vec::new();

    for range in ranges.iter().filter(|r| r.is_comment()) {
        match threads.last_mut() {
            Some(thread) if range.full.start <= thread.to() => {
                thread.comments.push(range.clone());
            }
            _ => threads.push(CommentThread {
                comments: vec![range.clone()],
            }),
        }
    }

    threads
}
