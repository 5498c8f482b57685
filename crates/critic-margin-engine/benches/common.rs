// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// A reviewed document with `paragraphs` paragraphs, each carrying every
/// markup kind and a two-comment thread.
#[allow(dead_code)]
pub fn generate_review_content(paragraphs: usize) -> String {
    let mut content = String::new();
    for i in 0..paragraphs {
        content.push_str(&format!(
            "Paragraph {i} has {{++an addition++}}, {{--a deletion--}} and a \
             {{~~typo~>fix~~}}. {{==Highlighted words==}}{{>>{{\"author\":\"ann\",\"timestamp\":{i}}}@@why?<<}}\
             {{>>because<<}} and plain text to finish.\n\n"
        ));
    }
    content
}

/// Same size as the review content but with unterminated openers.
#[allow(dead_code)]
pub fn generate_broken_content(paragraphs: usize) -> String {
    "Unclosed {++ addition and {>> comment with {-- nested openers ~> here.\n\n".repeat(paragraphs)
}
