pub mod editing;
pub mod layout;
pub mod parsing;

// Re-export key types for easier usage
pub use editing::{
    AuthorContext, Cmd, CriticWrapper, Document, DocumentError, EditWrapper, Outcome, Patch,
    SuggestionMode, apply_all, apply_change,
};
pub use layout::{
    CardPlacement, HeightCache, LayoutConfig, MarginLayout, MarginSync, PositionMapper,
    layout_threads, resolve_overlaps,
};
pub use parsing::{
    ParsedDoc,
    markup::{CommentMetadata, MarkupKind, MarkupRange, parse_markup},
    parse_document,
    rope::Span,
    threads::{CommentThread, group_threads},
};
