/// Removed text: `{--text--}`.
pub struct Deletion;

impl Deletion {
    pub const OPEN: &'static str = "{--";
    pub const CLOSE: &'static str = "--}";
}
