use serde::{Deserialize, Serialize};

use crate::parsing::rope::Span;

use super::kinds::Tag;

/// Author and creation time embedded in front of a comment body.
///
/// Serialised as the JSON prefix of a comment token, e.g.
/// `{"author":"alice","timestamp":1700000000000}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentMetadata {
    pub author: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Kind-specific data of a markup range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupKind {
    Addition,
    Deletion,
    /// `old` and `new` are the halves of the payload around the first `~>`.
    Substitution {
        old: String,
        new: String,
    },
    Highlight,
    Comment {
        metadata: Option<CommentMetadata>,
    },
}

impl MarkupKind {
    pub fn tag(&self) -> Tag {
        match self {
            MarkupKind::Addition => Tag::Addition,
            MarkupKind::Deletion => Tag::Deletion,
            MarkupKind::Substitution { .. } => Tag::Substitution,
            MarkupKind::Highlight => Tag::Highlight,
            MarkupKind::Comment { .. } => Tag::Comment,
        }
    }

    /// Lowercase name used in listings and snapshots.
    pub fn name(&self) -> &'static str {
        match self {
            MarkupKind::Addition => "addition",
            MarkupKind::Deletion => "deletion",
            MarkupKind::Substitution { .. } => "substitution",
            MarkupKind::Highlight => "highlight",
            MarkupKind::Comment { .. } => "comment",
        }
    }
}

/// One recognised markup token.
///
/// # Invariants
/// - `full.start <= inner.start <= inner.end <= full.end`
/// - `content` is the document text under `inner`
/// - ranges returned by the parser never overlap and ascend by `full.start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupRange {
    /// The whole token, delimiters included.
    pub full: Span,
    /// The payload: delimiters (and a comment's metadata prefix) excluded.
    pub inner: Span,
    /// Payload text. For substitutions this is the whole `old~>new` payload.
    pub content: String,
    pub kind: MarkupKind,
}

impl MarkupRange {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, MarkupKind::Comment { .. })
    }

    /// Comment metadata, if this is a comment that carries any.
    pub fn metadata(&self) -> Option<&CommentMetadata> {
        match &self.kind {
            MarkupKind::Comment { metadata } => metadata.as_ref(),
            _ => None,
        }
    }

    /// True when `offset` falls inside the token, delimiters included.
    pub fn contains(&self, offset: usize) -> bool {
        self.full.start <= offset && offset < self.full.end
    }
}
