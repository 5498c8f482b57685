use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::parsing::rope::Span;

/// Text mutations the host dispatches to its shared buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
    /// Several non-overlapping replacements applied as one edit.
    ReplaceMany {
        edits: Vec<(std::ops::Range<usize>, String)>,
    },
}

/// Compile a command into a delta against `text`.
///
/// Ranges are clamped into the text (snapped to char boundaries), so a
/// command built from stale offsets never panics. `ReplaceMany` edits are
/// sorted; edits overlapping an earlier one are skipped.
pub(crate) fn compile_command(text: &str, cmd: &Cmd) -> Delta<RopeInfo> {
    let clamp = |r: &std::ops::Range<usize>| Span::from(r.clone()).clamped(text).as_range();
    let mut builder = Builder::new(text.len());

    match cmd {
        Cmd::InsertText { at, text: insert } => {
            let at = clamp(&(*at..*at));
            builder.replace(at, Rope::from(insert));
        }
        Cmd::DeleteRange { range } => {
            builder.delete(clamp(range));
        }
        Cmd::ReplaceRange { range, text: with } => {
            builder.replace(clamp(range), Rope::from(with));
        }
        Cmd::ReplaceMany { edits } => {
            let mut sorted: Vec<_> = edits.iter().map(|(r, t)| (clamp(r), t)).collect();
            sorted.sort_by_key(|(r, _)| (r.start, r.end));
            let mut last_end = 0;
            for (range, with) in sorted {
                if range.start < last_end {
                    continue;
                }
                last_end = range.end;
                builder.replace(range, Rope::from(with.as_str()));
            }
        }
    }

    builder.build()
}
