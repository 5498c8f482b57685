use std::collections::BTreeMap;

use serde::Serialize;

use crate::parsing::{
    markup::{MarkupKind, MarkupRange},
    rope::preview,
    threads::CommentThread,
};

#[derive(Serialize)]
pub struct Snap {
    pub ranges: Vec<RangeSnap>,
    pub threads: Vec<ThreadSnap>,
}

#[derive(Serialize)]
pub struct RangeSnap {
    pub kind: String,
    pub span: (usize, usize),
    pub inner: (usize, usize),
    pub text: String,
    pub parts: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct ThreadSnap {
    pub span: (usize, usize),
    pub comments: usize,
}

pub fn normalize(ranges: &[MarkupRange], threads: &[CommentThread]) -> Snap {
    let ranges = ranges
        .iter()
        .map(|r| {
            let mut parts = BTreeMap::new();
            match &r.kind {
                MarkupKind::Substitution { old, new } => {
                    parts.insert("old".into(), preview(old, 40));
                    parts.insert("new".into(), preview(new, 40));
                }
                MarkupKind::Comment {
                    metadata: Some(meta),
                } => {
                    parts.insert("author".into(), meta.author.clone());
                }
                _ => {}
            }
            RangeSnap {
                kind: r.kind.name().to_string(),
                span: (r.full.start, r.full.end),
                inner: (r.inner.start, r.inner.end),
                text: preview(&r.content, 60),
                parts,
            }
        })
        .collect();

    let threads = threads
        .iter()
        .map(|t| ThreadSnap {
            span: (t.from(), t.to()),
            comments: t.len(),
        })
        .collect();

    Snap { ranges, threads }
}
