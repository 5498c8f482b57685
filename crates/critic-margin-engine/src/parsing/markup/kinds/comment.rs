/// Margin comment: `{>>{"author":"..","timestamp":..}@@body<<}`.
///
/// The JSON metadata prefix is optional and ends at the first `META_END`.
pub struct Comment;

impl Comment {
    pub const OPEN: &'static str = "{>>";
    pub const CLOSE: &'static str = "<<}";
    pub const META_END: &'static str = "@@";
}
