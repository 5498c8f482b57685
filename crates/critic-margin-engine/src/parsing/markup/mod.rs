//! # Markup Parsing
//!
//! Cursor-based scanner for the five CriticMarkup kinds embedded in a shared
//! document.
//!
//! ## Architecture
//!
//! The document text is the only source of truth. Ranges are recomputed from
//! scratch on every read and carry no identity beyond their position, so
//! concurrent edits never leave stale parser state behind.
//!
//! ## Modules
//!
//! - **`types`**: `MarkupRange`, `MarkupKind` (sum type over the five kinds), `CommentMetadata`
//! - **`kinds`**: Per-kind types owning their delimiter constants
//! - **`cursor`**: `Cursor` for byte-by-byte scanning with position tracking
//! - **`parser`**: `parse_markup()` main entry point
//!
//! ## Non-nesting
//!
//! The grammar does not nest. An opener of another kind inside a token means
//! the outer token is unterminated, and it is left as plain prose.

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{parse_markup, parse_markup_at};
pub use types::{CommentMetadata, MarkupKind, MarkupRange};
