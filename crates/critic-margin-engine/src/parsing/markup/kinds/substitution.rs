/// Replaced text: `{~~old~>new~~}`.
///
/// The payload splits on the first `SEPARATOR`; a payload without one is not
/// a substitution.
pub struct Substitution;

impl Substitution {
    pub const OPEN: &'static str = "{~~";
    pub const CLOSE: &'static str = "~~}";
    pub const SEPARATOR: &'static str = "~>";
}
