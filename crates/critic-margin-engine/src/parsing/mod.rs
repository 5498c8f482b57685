pub mod markup;
pub mod rope;
pub mod snapshot;
pub mod threads;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use markup::{MarkupRange, parse_markup};
use threads::{CommentThread, group_threads};

/// Everything derived from one read of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDoc {
    pub ranges: Vec<MarkupRange>,
    pub threads: Vec<CommentThread>,
}

/// Parses markup ranges and groups comment threads in one go.
pub fn parse_document(text: &str) -> ParsedDoc {
    let ranges = parse_markup(text);
    let threads = group_threads(&ranges);
    ParsedDoc { ranges, threads }
}

/// Convenience: parse straight from a rope buffer.
pub fn parse_rope(rope: &Rope) -> ParsedDoc {
    parse_document(&rope.slice_to_cow(..))
}
