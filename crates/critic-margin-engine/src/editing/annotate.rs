//! Building markup text for new comments, replies and suggestions.
//!
//! The writer never mutates a document. It returns token text, or a [`Cmd`]
//! for the host to dispatch through its shared buffer.

use crate::{
    editing::Cmd,
    parsing::{
        markup::kinds::{Addition, Comment, Deletion, Highlight, Substitution},
        threads::CommentThread,
    },
};

/// Delimiters that must not survive verbatim inside generated payloads.
const OPENERS: [&str; 5] = [
    Addition::OPEN,
    Deletion::OPEN,
    Substitution::OPEN,
    Highlight::OPEN,
    Comment::OPEN,
];

/// Whether local edits are recorded as suggestions.
///
/// Owned by the host editor; the engine only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuggestionMode {
    #[default]
    Off,
    On,
}

impl From<bool> for SuggestionMode {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Who is making an edit, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorContext {
    pub author: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Policy for turning a plain edit into suggestion markup.
pub trait EditWrapper {
    /// Returns the text that should replace `old_text` in the document.
    fn wrap_edit(&self, old_text: &str, new_text: &str, author: &AuthorContext) -> String;
}

/// Default policy: addition, deletion or substitution depending on which side
/// of the edit is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticWrapper;

impl EditWrapper for CriticWrapper {
    fn wrap_edit(&self, old_text: &str, new_text: &str, _author: &AuthorContext) -> String {
        match (old_text.is_empty(), new_text.is_empty()) {
            (true, true) => String::new(),
            (true, false) => format!(
                "{}{}{}",
                Addition::OPEN,
                neutralize(new_text, &[Addition::CLOSE]),
                Addition::CLOSE
            ),
            (false, true) => format!(
                "{}{}{}",
                Deletion::OPEN,
                neutralize(old_text, &[Deletion::CLOSE]),
                Deletion::CLOSE
            ),
            (false, false) if old_text == new_text => new_text.to_string(),
            (false, false) => format!(
                "{}{}{}{}{}",
                Substitution::OPEN,
                neutralize(old_text, &[Substitution::CLOSE, Substitution::SEPARATOR]),
                Substitution::SEPARATOR,
                neutralize(new_text, &[Substitution::CLOSE]),
                Substitution::CLOSE
            ),
        }
    }
}

/// Text to write for an edit given the host's suggestion mode.
pub fn compose_edit(
    mode: SuggestionMode,
    policy: &dyn EditWrapper,
    old_text: &str,
    new_text: &str,
    author: &AuthorContext,
) -> String {
    match mode {
        SuggestionMode::Off => new_text.to_string(),
        SuggestionMode::On => policy.wrap_edit(old_text, new_text, author),
    }
}

/// Builds `{>>{"author":..,"timestamp":..}@@content<<}`.
///
/// Delimiter sequences inside `author` or `content` are broken up so the
/// token always parses back as exactly one comment with intact metadata.
pub fn build_comment_token(author: &str, timestamp_ms: i64, content: &str) -> String {
    let author = neutralize(author, &[Comment::CLOSE, Comment::META_END]);
    let metadata = serde_json::json!({
        "author": author,
        "timestamp": timestamp_ms,
    });
    format!(
        "{}{}{}{}{}",
        Comment::OPEN,
        metadata,
        Comment::META_END,
        neutralize(content, &[Comment::CLOSE]),
        Comment::CLOSE
    )
}

/// Inserts a reply flush against the end of `thread`, so it joins it.
pub fn insert_reply_at(thread: &CommentThread, token: String) -> Cmd {
    Cmd::InsertText {
        at: thread.to(),
        text: token,
    }
}

/// Inserts a new comment at `offset`.
///
/// Starts a fresh thread unless `offset` happens to touch an existing
/// comment, in which case it joins that one.
pub fn insert_comment_at(offset: usize, token: String) -> Cmd {
    Cmd::InsertText {
        at: offset,
        text: token,
    }
}

/// Highlights `selected` and attaches the comment token right after it.
///
/// `range` is the selection in the document; `selected` its current text.
pub fn comment_on_selection(range: std::ops::Range<usize>, selected: &str, token: String) -> Cmd {
    let text = if selected.is_empty() {
        token
    } else {
        format!(
            "{}{}{}{}",
            Highlight::OPEN,
            neutralize(selected, &[Highlight::CLOSE]),
            Highlight::CLOSE,
            token
        )
    };
    Cmd::ReplaceRange { range, text }
}

/// Breaks every opener plus `closers` by inserting a space after the first char.
fn neutralize(text: &str, closers: &[&str]) -> String {
    let mut out = text.to_string();
    for seq in OPENERS.iter().chain(closers) {
        let (head, tail) = seq.split_at(1);
        let broken = format!("{head} {tail}");
        while out.contains(seq) {
            out = out.replace(seq, &broken);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{
        markup::{MarkupKind, parse_markup},
        parse_document,
    };
    use pretty_assertions::assert_eq;

    fn ctx() -> AuthorContext {
        AuthorContext {
            author: "alice".into(),
            timestamp: 1,
        }
    }

    fn first_thread(doc: &str) -> CommentThread {
        parse_document(doc).threads.into_iter().next().expect("a thread")
    }

    fn insert(doc: &str, cmd: Cmd) -> String {
        match cmd {
            Cmd::InsertText { at, text } => {
                let mut out = doc.to_string();
                out.insert_str(at, &text);
                out
            }
            other => panic!("expected InsertText, got {other:?}"),
        }
    }

    #[test]
    fn comment_token_format() {
        let token = build_comment_token("alice", 1234567890, "my note");
        assert_eq!(
            token,
            r#"{>>{"author":"alice","timestamp":1234567890}@@my note<<}"#
        );
    }

    #[test]
    fn comment_token_round_trips_through_parser() {
        let token = build_comment_token("bob", 42, "looks good");
        let ranges = parse_markup(&token);
        assert_eq!(ranges.len(), 1);
        let meta = ranges[0].metadata().unwrap();
        assert_eq!(meta.author, "bob");
        assert_eq!(meta.timestamp, 42);
        assert_eq!(ranges[0].content, "looks good");
    }

    #[test]
    fn hostile_content_still_parses_as_one_comment() {
        let token = build_comment_token("e@@vil<<}", 7, "try {++this++} and <<} that");
        let ranges = parse_markup(&token);
        assert_eq!(ranges.len(), 1, "{token}");
        assert_eq!(ranges[0].full.end, token.len());
        let meta = ranges[0].metadata().unwrap();
        assert_eq!(meta.author, "e@ @vil< <}");
        assert_eq!(ranges[0].content, "try { ++this++} and < <} that");
    }

    #[test]
    fn quotes_in_author_are_json_escaped() {
        let token = build_comment_token(r#"Dr "Q""#, 3, "hi");
        let meta = parse_markup(&token)[0].metadata().cloned().unwrap();
        assert_eq!(meta.author, r#"Dr "Q""#);
    }

    #[test]
    fn reply_joins_thread() {
        let doc = "text{>>first<<} more";
        let thread = first_thread(doc);
        let token = build_comment_token("bob", 2, "reply");

        let out = insert(doc, insert_reply_at(&thread, token));

        let threads = parse_document(&out).threads;
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].len(), 2);
        assert_eq!(threads[0].replies()[0].content, "reply");
    }

    #[test]
    fn reply_after_concurrent_edit_starts_new_thread() {
        // A collaborator typed "!" at the thread's end at the same moment and
        // the shared buffer ordered their character before our reply.
        let doc = "text{>>first<<} more";
        let thread = first_thread(doc);
        let Cmd::InsertText { at, text } =
            insert_reply_at(&thread, build_comment_token("bob", 2, "reply"))
        else {
            panic!("expected InsertText");
        };

        let mut raced = "text{>>first<<}! more".to_string();
        raced.insert_str(at + 1, &text);

        let threads = parse_document(&raced).threads;
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1].root().content, "reply");
    }

    #[test]
    fn new_comment_away_from_threads_is_its_own_thread() {
        let doc = "one {>>a<<} two";
        let out = insert(doc, insert_comment_at(14, build_comment_token("c", 3, "b")));
        assert_eq!(parse_document(&out).threads.len(), 2);
    }

    #[test]
    fn new_comment_touching_a_thread_joins_it() {
        let doc = "one {>>a<<} two";
        let out = insert(doc, insert_comment_at(4, build_comment_token("c", 3, "b")));
        let threads = parse_document(&out).threads;
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].root().content, "b");
    }

    #[test]
    fn comment_on_selection_wraps_highlight() {
        let cmd = comment_on_selection(4..9, "quick", build_comment_token("a", 1, "why"));
        let Cmd::ReplaceRange { range, text } = cmd else {
            panic!("expected ReplaceRange");
        };
        let mut doc = "the quick fox".to_string();
        doc.replace_range(range, &text);

        let parsed = parse_document(&doc);
        assert_eq!(parsed.ranges.len(), 2);
        assert_eq!(parsed.ranges[0].kind, MarkupKind::Highlight);
        assert_eq!(parsed.ranges[0].content, "quick");
        assert!(parsed.ranges[1].is_comment());
        assert_eq!(parsed.ranges[0].full.end, parsed.ranges[1].full.start);
    }

    #[test]
    fn comment_on_empty_selection_is_plain_insert() {
        let token = build_comment_token("a", 1, "x");
        let cmd = comment_on_selection(3..3, "", token.clone());
        assert_eq!(cmd, Cmd::ReplaceRange { range: 3..3, text: token });
    }

    #[test]
    fn critic_wrapper_shapes() {
        let w = CriticWrapper;
        assert_eq!(w.wrap_edit("", "new", &ctx()), "{++new++}");
        assert_eq!(w.wrap_edit("old", "", &ctx()), "{--old--}");
        assert_eq!(w.wrap_edit("old", "new", &ctx()), "{~~old~>new~~}");
        assert_eq!(w.wrap_edit("same", "same", &ctx()), "same");
        assert_eq!(w.wrap_edit("", "", &ctx()), "");
    }

    #[test]
    fn wrapped_substitution_keeps_separator_unambiguous() {
        let wrapped = CriticWrapper.wrap_edit("a~>b", "c", &ctx());
        let ranges = parse_markup(&wrapped);
        assert_eq!(
            ranges[0].kind,
            MarkupKind::Substitution {
                old: "a~ >b".into(),
                new: "c".into()
            }
        );
    }

    #[test]
    fn compose_edit_respects_mode() {
        let w = CriticWrapper;
        assert_eq!(compose_edit(SuggestionMode::Off, &w, "a", "b", &ctx()), "b");
        assert_eq!(
            compose_edit(SuggestionMode::On, &w, "a", "b", &ctx()),
            "{~~a~>b~~}"
        );
        assert_eq!(SuggestionMode::from(true), SuggestionMode::On);
        assert_eq!(SuggestionMode::default(), SuggestionMode::Off);
    }
}
