/*!
 * # Editing Core Module
 *
 * Everything that turns a review decision into new document text.
 *
 * ## Architecture Overview
 *
 * ### 1. Text is the only state
 * - Annotations live as literal markup inside the shared document, so they
 *   reach every collaborator through the ordinary text sync
 * - Nothing here caches ranges; callers re-parse before every edit
 *
 * ### 2. Pure rewrites first
 * - **`changes`**: `apply_change(text, range, outcome)` and `apply_all`, pure
 *   string functions with the per-kind accept/reject table
 * - **`annotate`**: comment tokens, reply/comment insertion commands, and the
 *   suggestion-mode `EditWrapper` policy
 *
 * ### 3. Command-based host adapter
 * - **`commands`**: `Cmd` enum compiled to xi-rope `Delta`s
 * - **`document`**: `Document` over an `xi_rope::Rope`, applying commands and
 *   re-deriving ranges/threads on each read
 * - **`patch`**: Edit result metadata including changed ranges and new selection
 *
 * ## Usage Pattern
 *
 * ```rust
 * use critic_margin_engine::editing::*;
 *
 * let mut doc = Document::from_bytes(b"Draft {>>tighten this<<}").unwrap();
 * let thread = doc.threads().remove(0);
 * doc.reply(&thread, "bob", 1_700_000_000_000, "done");
 * assert_eq!(doc.threads()[0].comments.len(), 2);
 *
 * doc.resolve_all(changes::Outcome::Reject);
 * assert_eq!(doc.text(), "Draft ");
 * ```
 */

pub mod annotate;
pub mod changes;
pub mod commands;
pub mod document;
pub mod patch;

pub use annotate::{
    AuthorContext, CriticWrapper, EditWrapper, SuggestionMode, build_comment_token, compose_edit,
    insert_comment_at, insert_reply_at,
};
pub use changes::{Outcome, apply_all, apply_change, replacement};
pub use commands::Cmd;
pub use document::{Document, DocumentError};
pub use patch::Patch;
