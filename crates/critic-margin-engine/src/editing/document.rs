use log::debug;
use xi_rope::{Delta, Rope, RopeInfo, delta::Transformer};

use crate::editing::{
    Cmd, Patch,
    annotate::{
        self, AuthorContext, EditWrapper, SuggestionMode, build_comment_token, compose_edit,
    },
    changes::{Outcome, replacement},
    commands::compile_command,
};
use crate::parsing::{
    ParsedDoc, markup::MarkupRange, parse_rope, rope::Span, threads::CommentThread,
};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A review document: the host-side view of the shared text buffer.
///
/// ## Single Source of Truth
/// - The whole text lives in one `xi_rope::Rope`
/// - Markup ranges and threads are re-derived from the rope on every read;
///   nothing about them is cached between edits
///
/// ## Command-Based Editing
/// - Accept/reject, new comments, replies and suggestions all compile to a
///   [`Cmd`], then to a rope `Delta`
/// - `apply` returns a [`Patch`] with the inserted ranges, the transformed
///   selection and the new version
///
/// ```rust
/// # use critic_margin_engine::editing::{Document, changes::Outcome};
/// let mut doc = Document::from_bytes(b"Hello {++big ++}world").unwrap();
/// let range = doc.ranges().remove(0);
/// doc.resolve(&range, Outcome::Accept);
/// assert_eq!(doc.text(), "Hello big world");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) buffer: Rope,
    /// Current selection/cursor position as byte offsets in buffer
    pub(crate) selection: std::ops::Range<usize>,
    /// Incremented on each edit
    pub(crate) version: u64,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    pub fn from_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
        }
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.text().into_bytes()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> std::ops::Range<usize> {
        self.selection.clone()
    }

    /// Set the selection, snapped onto char boundaries inside the buffer.
    pub fn set_selection(&mut self, selection: std::ops::Range<usize>) {
        self.selection = self.snap(selection);
    }

    /// Text under `range`, snapped onto char boundaries inside the buffer.
    pub fn slice(&self, range: std::ops::Range<usize>) -> String {
        crate::parsing::rope::slice_to_string(&self.buffer, self.snap(range).into())
    }

    fn snap(&self, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
        Span::from(range).clamped(&self.text()).as_range()
    }

    /// Fresh parse of the current text.
    pub fn parse(&self) -> ParsedDoc {
        parse_rope(&self.buffer)
    }

    pub fn ranges(&self) -> Vec<MarkupRange> {
        self.parse().ranges
    }

    pub fn threads(&self) -> Vec<CommentThread> {
        self.parse().threads
    }

    /// Markup range containing `offset`, if any.
    pub fn range_at(&self, offset: usize) -> Option<MarkupRange> {
        self.ranges().into_iter().find(|r| r.contains(offset))
    }

    /// Apply command to document
    ///
    /// 1. Compile the command to a rope `Delta` (offsets clamped)
    /// 2. Collect inserted ranges for the patch
    /// 3. Apply the delta to the buffer
    /// 4. Transform the selection through the delta
    /// 5. Bump the version
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = compile_command(&self.text(), &cmd);
        let changed = inserted_ranges(&delta);

        self.buffer = delta.apply(&self.buffer);

        let mut transformer = Transformer::new(&delta);
        let start = transformer.transform(self.selection.start, true);
        let end = transformer.transform(self.selection.end, true);
        self.selection = start..end.max(start);

        self.version += 1;
        debug!(
            "applied edit v{}: {} changed ranges, len {}",
            self.version,
            changed.len(),
            self.buffer.len()
        );

        Patch {
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
        }
    }

    /// Accept or reject one range.
    ///
    /// The range must come from a parse of the current text; see
    /// [`apply_change`](crate::editing::changes::apply_change).
    pub fn resolve(&mut self, range: &MarkupRange, outcome: Outcome) -> Patch {
        self.apply(Cmd::ReplaceRange {
            range: range.full.as_range(),
            text: replacement(range, outcome).to_string(),
        })
    }

    pub fn accept(&mut self, range: &MarkupRange) -> Patch {
        self.resolve(range, Outcome::Accept)
    }

    pub fn reject(&mut self, range: &MarkupRange) -> Patch {
        self.resolve(range, Outcome::Reject)
    }

    /// Accept or reject every range in the document as one edit.
    pub fn resolve_all(&mut self, outcome: Outcome) -> Patch {
        let edits = self
            .ranges()
            .iter()
            .map(|r| (r.full.as_range(), replacement(r, outcome).to_string()))
            .collect();
        self.apply(Cmd::ReplaceMany { edits })
    }

    /// Insert a new comment at `at`.
    pub fn add_comment(&mut self, at: usize, author: &str, timestamp: i64, content: &str) -> Patch {
        let token = build_comment_token(author, timestamp, content);
        self.apply(annotate::insert_comment_at(at, token))
    }

    /// Highlight the current selection and attach a comment to it.
    pub fn comment_on_selection(&mut self, author: &str, timestamp: i64, content: &str) -> Patch {
        let range = self.selection();
        let selected = self.slice(range.clone());
        let token = build_comment_token(author, timestamp, content);
        self.apply(annotate::comment_on_selection(range, &selected, token))
    }

    /// Append a reply to `thread`.
    pub fn reply(
        &mut self,
        thread: &CommentThread,
        author: &str,
        timestamp: i64,
        content: &str,
    ) -> Patch {
        let token = build_comment_token(author, timestamp, content);
        self.apply(annotate::insert_reply_at(thread, token))
    }

    /// Replace `range` with `new_text`, wrapped as a suggestion when `mode` is on.
    pub fn edit(
        &mut self,
        range: std::ops::Range<usize>,
        new_text: &str,
        mode: SuggestionMode,
        policy: &dyn EditWrapper,
        author: &AuthorContext,
    ) -> Patch {
        let range = self.snap(range);
        let old_text = self.slice(range.clone());
        let text = compose_edit(mode, policy, &old_text, new_text, author);
        self.apply(Cmd::ReplaceRange { range, text })
    }

    /// Zero-based line containing `offset` (clamped to the buffer).
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.buffer.line_of_offset(offset.min(self.len()))
    }

    /// Position mapper for text hosts where one line is one unit of height.
    pub fn line_mapper(&self) -> impl Fn(usize) -> f64 + '_ {
        move |offset| self.line_of_offset(offset) as f64
    }
}

/// Ranges of inserted text in post-edit coordinates.
fn inserted_ranges(delta: &Delta<RopeInfo>) -> Vec<std::ops::Range<usize>> {
    let mut changed = Vec::new();
    let mut cursor = 0;
    for op in delta.els.iter() {
        match op {
            xi_rope::delta::DeltaElement::Copy(from, to) => {
                cursor += to - from;
            }
            xi_rope::delta::DeltaElement::Insert(inserted) => {
                let start = cursor;
                let end = cursor + inserted.len();
                changed.push(start..end);
                cursor = end;
            }
        }
    }
    changed
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text() && self.version == other.version
    }
}
