//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts parsed ranges and threads to a stable, serializable
//!   `Snap` format for `insta` snapshot testing
//! - **`invariants`**: Runtime checks for parser correctness (spans in bounds,
//!   inner spans contained in full spans, no overlap, zero-gap threads)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
