use log::{debug, trace};

use crate::parsing::rope::Span;

use super::{
    cursor::Cursor,
    kinds::{self, Comment, Delimiters, Substitution, Tag},
    types::{CommentMetadata, MarkupKind, MarkupRange},
};

/// Parses document text into an ordered sequence of [`MarkupRange`]s.
///
/// Single left-to-right pass. Text outside recognised tokens is not
/// reported; only the markup ranges themselves are returned.
///
/// # Fail-open
/// Half-written markup is expected (collaborators edit the same text
/// concurrently), so it is never an error. An opener is dropped when:
/// - no matching closer follows before end of text, or
/// - an opener of a *different* kind appears before the closer, or
/// - it is a substitution whose payload has no `~>`.
///
/// The scan then resumes one byte after the dropped opener, so a complete
/// token nested in the debris is still found.
///
/// Linear in the input for each kind: once a scan for a kind's closer
/// fails, later openers of that kind that would fail the same way are
/// dropped without rescanning.
pub fn parse_markup(s: &str) -> Vec<MarkupRange> {
    parse_markup_at(0, s)
}

/// Like [`parse_markup`], with spans offset by `base`.
pub fn parse_markup_at(base: usize, s: &str) -> Vec<MarkupRange> {
    let mut cur = Cursor::new(s, base);
    let mut dead = DeadZones::default();
    let mut out = vec![];

    while !cur.eof() {
        if let Some(range) = try_parse_token(&mut cur, &mut dead) {
            out.push(range);
            continue;
        }
        cur.bump();
    }

    debug!("parsed {} markup ranges from {} bytes", out.len(), s.len());
    out
}

/// Returns the delimiter pair whose opener starts at the cursor, if any.
fn opener_at(cur: &Cursor<'_>) -> Option<Delimiters> {
    kinds::ALL.into_iter().find(|d| cur.starts_with(d.open))
}

/// Per-kind record of where a failed closer scan stopped.
///
/// A scan that fails at absolute offset `q` saw neither its closer nor a
/// foreign opener anywhere before `q`, so every later opener of the same
/// kind whose payload starts at or before `q` stops at `q` too and fails the
/// same way. End of text is recorded as `usize::MAX`.
#[derive(Default)]
struct DeadZones {
    until: [usize; 5],
}

impl DeadZones {
    fn covers(&self, tag: Tag, payload_start: usize) -> bool {
        payload_start <= self.until[tag as usize]
    }

    fn mark(&mut self, tag: Tag, stop: usize) {
        let slot = &mut self.until[tag as usize];
        *slot = (*slot).max(stop);
    }
}

/// Attempts to parse one token starting at the current position.
///
/// On failure, cursor position is restored.
fn try_parse_token(cur: &mut Cursor<'_>, dead: &mut DeadZones) -> Option<MarkupRange> {
    let delims = opener_at(cur)?;

    let start = cur.pos();
    let inner_start = start + delims.open.len();
    if dead.covers(delims.tag, inner_start) {
        trace!("{:?} at {start} inside a known dead zone", delims.tag);
        return None;
    }

    let saved = cur.clone();
    cur.bump_n(delims.open.len());

    loop {
        if cur.eof() {
            trace!("unterminated {:?} at {start}", delims.tag);
            dead.mark(delims.tag, usize::MAX);
            *cur = saved;
            return None;
        }
        if cur.starts_with(delims.close) {
            break;
        }
        if let Some(other) = opener_at(cur)
            && other.tag != delims.tag
        {
            trace!(
                "{:?} at {start} interrupted by {:?} at {}",
                delims.tag,
                other.tag,
                cur.pos()
            );
            dead.mark(delims.tag, cur.pos());
            *cur = saved;
            return None;
        }
        cur.bump();
    }

    let inner_end = cur.pos();
    cur.bump_n(delims.close.len());
    let full = Span::new(start, cur.pos());
    let payload = Span::new(inner_start, inner_end);

    match build_range(cur, delims.tag, full, payload) {
        Some(range) => Some(range),
        None => {
            trace!("malformed {:?} at {start}", delims.tag);
            dead.mark(delims.tag, inner_end);
            *cur = saved;
            None
        }
    }
}

/// Turns a delimited payload into a typed range.
fn build_range(cur: &Cursor<'_>, tag: Tag, full: Span, payload: Span) -> Option<MarkupRange> {
    let text = cur.text(payload);

    let (inner, kind) = match tag {
        Tag::Addition => (payload, MarkupKind::Addition),
        Tag::Deletion => (payload, MarkupKind::Deletion),
        Tag::Highlight => (payload, MarkupKind::Highlight),
        Tag::Substitution => {
            let (old, new) = text.split_once(Substitution::SEPARATOR)?;
            (
                payload,
                MarkupKind::Substitution {
                    old: old.to_string(),
                    new: new.to_string(),
                },
            )
        }
        Tag::Comment => {
            let (metadata, body_offset) = split_comment_metadata(text);
            (
                Span::new(payload.start + body_offset, payload.end),
                MarkupKind::Comment { metadata },
            )
        }
    };

    Some(MarkupRange {
        full,
        inner,
        content: cur.text(inner).to_string(),
        kind,
    })
}

/// Splits a comment payload into metadata and the byte offset of the body.
///
/// Metadata is whatever precedes the first `@@`, but only if it
/// deserialises; otherwise the whole payload is the body.
fn split_comment_metadata(payload: &str) -> (Option<CommentMetadata>, usize) {
    let Some(idx) = payload.find(Comment::META_END) else {
        return (None, 0);
    };
    match serde_json::from_str::<CommentMetadata>(&payload[..idx]) {
        Ok(metadata) => (Some(metadata), idx + Comment::META_END.len()),
        Err(err) => {
            trace!("comment metadata ignored: {err}");
            (None, 0)
        }
    }
}
