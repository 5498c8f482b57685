//! Integration tests for the parsing module.
//!
//! Uses snapshot testing with YAML format for readability.
//! Fixtures (.md) and snapshots (.snap) are co-located in `fixtures/`.

use crate::parsing::{markup::MarkupKind, parse_document, parse_rope, snapshot};

// Fixture-based snapshot tests

#[test]
fn fixture_review_paragraph() {
    assert_fixture("review_paragraph");
}

#[test]
fn fixture_broken_markup() {
    assert_fixture("broken_markup");
}

#[test]
fn fixture_threads() {
    assert_fixture("threads");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/parsing/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let doc = parse_document(&md);
    snapshot::invariants(&md, &doc.ranges, &doc.threads);

    let snap = snapshot::normalize(&doc.ranges, &doc.threads);
    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_yaml_snapshot!(name, snap);
    });
}

// Invariant tests

/// Slicing any full span reproduces the exact markup token.
#[test]
fn lossless_span_invariant() {
    let md = "Hello {++big ++}world{>>nice<<}!";
    let doc = parse_document(md);

    let tokens: Vec<_> = doc.ranges.iter().map(|r| &md[r.full.as_range()]).collect();
    assert_eq!(tokens, vec!["{++big ++}", "{>>nice<<}"]);
}

/// Rope and string entry points agree.
#[test]
fn rope_and_str_parse_identically() {
    let md = "a {~~b~>c~~} d {>>e<<}{>>f<<}";
    let rope = xi_rope::Rope::from(md);
    assert_eq!(parse_rope(&rope), parse_document(md));
}

/// Half-typed markup at the end of the text does not hide earlier tokens.
#[test]
fn trailing_partial_markup_keeps_earlier_ranges() {
    let md = "{--old--} and then {~~half~>";
    let doc = parse_document(md);
    assert_eq!(doc.ranges.len(), 1);
    assert_eq!(doc.ranges[0].kind, MarkupKind::Deletion);
}

/// Empty document produces nothing.
#[test]
fn empty_document() {
    let doc = parse_document("");
    assert!(doc.ranges.is_empty());
    assert!(doc.threads.is_empty());
}

/// Markup split across lines still parses as one token.
#[test]
fn token_spanning_paragraphs() {
    let md = "first {==para\n\nsecond==} para";
    let doc = parse_document(md);
    snapshot::invariants(md, &doc.ranges, &doc.threads);
    assert_eq!(doc.ranges.len(), 1);
    assert_eq!(doc.ranges[0].content, "para\n\nsecond");
}
