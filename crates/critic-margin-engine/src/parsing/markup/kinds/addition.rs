/// Inserted text: `{++text++}`.
pub struct Addition;

impl Addition {
    pub const OPEN: &'static str = "{++";
    pub const CLOSE: &'static str = "++}";
}
