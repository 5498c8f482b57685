pub mod slice;
pub mod span;

pub use slice::{preview, slice_to_string};
pub use span::{Span, floor_char_boundary};
