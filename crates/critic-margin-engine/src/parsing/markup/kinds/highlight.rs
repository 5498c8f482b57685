/// Emphasised text with no competing alternative: `{==text==}`.
pub struct Highlight;

impl Highlight {
    pub const OPEN: &'static str = "{==";
    pub const CLOSE: &'static str = "==}";
}
