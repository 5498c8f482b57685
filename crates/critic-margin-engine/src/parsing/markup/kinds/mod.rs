//! # Markup Kinds
//!
//! Each markup kind owns its delimiter constants; the parser, the change
//! applier and the annotation writer all read them from here and never
//! hardcode `{++` or `<<}` themselves.
//!
//! ## Types
//!
//! - **`Addition`**: `{++` / `++}`
//! - **`Deletion`**: `{--` / `--}`
//! - **`Substitution`**: `{~~` / `~~}`, payload split on `~>`
//! - **`Highlight`**: `{==` / `==}`
//! - **`Comment`**: `{>>` / `<<}`, optional metadata ended by `@@`

pub mod addition;
pub mod comment;
pub mod deletion;
pub mod highlight;
pub mod substitution;

pub use addition::Addition;
pub use comment::Comment;
pub use deletion::Deletion;
pub use highlight::Highlight;
pub use substitution::Substitution;

/// Discriminant-only view of a markup kind, used while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Addition,
    Deletion,
    Substitution,
    Highlight,
    Comment,
}

/// Opening and closing delimiters for one markup kind.
#[derive(Debug, Clone, Copy)]
pub struct Delimiters {
    pub tag: Tag,
    pub open: &'static str,
    pub close: &'static str,
}

/// All five delimiter pairs, in the order the scanner tries them.
pub const ALL: [Delimiters; 5] = [
    Delimiters {
        tag: Tag::Addition,
        open: Addition::OPEN,
        close: Addition::CLOSE,
    },
    Delimiters {
        tag: Tag::Deletion,
        open: Deletion::OPEN,
        close: Deletion::CLOSE,
    },
    Delimiters {
        tag: Tag::Substitution,
        open: Substitution::OPEN,
        close: Substitution::CLOSE,
    },
    Delimiters {
        tag: Tag::Highlight,
        open: Highlight::OPEN,
        close: Highlight::CLOSE,
    },
    Delimiters {
        tag: Tag::Comment,
        open: Comment::OPEN,
        close: Comment::CLOSE,
    },
];

impl Delimiters {
    pub fn for_tag(tag: Tag) -> Delimiters {
        match tag {
            Tag::Addition => ALL[0],
            Tag::Deletion => ALL[1],
            Tag::Substitution => ALL[2],
            Tag::Highlight => ALL[3],
            Tag::Comment => ALL[4],
        }
    }
}
