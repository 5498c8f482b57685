use anyhow::{Context, Result, anyhow, bail};
use critic_margin_engine::{
    Document, MarkupKind, Outcome, apply_all, parse_document, parsing::rope::preview,
};
use log::{debug, info};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage:
  critic-margin-cli view <file>
  critic-margin-cli list <file>
  critic-margin-cli accept-all <file>
  critic-margin-cli reject-all <file>
  critic-margin-cli comment <file> <offset> <text>
  critic-margin-cli reply <file> <thread-index> <text>";

#[derive(Debug, PartialEq)]
pub enum Command {
    View(PathBuf),
    List(PathBuf),
    Resolve(PathBuf, Outcome),
    Comment {
        path: PathBuf,
        offset: usize,
        text: String,
    },
    Reply {
        path: PathBuf,
        thread: usize,
        text: String,
    },
}

impl Command {
    /// Parses `args` without the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let arg = |i: usize, what: &str| -> Result<&String> {
            args.get(i).ok_or_else(|| anyhow!("missing {what}"))
        };
        let command = arg(0, "command")?;
        let path = PathBuf::from(arg(1, "file")?);

        let (parsed, expected) = match command.as_str() {
            "view" => (Command::View(path), 2),
            "list" => (Command::List(path), 2),
            "accept-all" => (Command::Resolve(path, Outcome::Accept), 2),
            "reject-all" => (Command::Resolve(path, Outcome::Reject), 2),
            "comment" => {
                let offset = arg(2, "offset")?
                    .parse::<usize>()
                    .context("offset must be a byte offset")?;
                let text = arg(3, "comment text")?.clone();
                (Command::Comment { path, offset, text }, 4)
            }
            "reply" => {
                let thread = arg(2, "thread index")?
                    .parse::<usize>()
                    .context("thread index must be a number")?;
                let text = arg(3, "reply text")?.clone();
                (Command::Reply { path, thread, text }, 4)
            }
            other => bail!("unknown command '{other}'"),
        };
        if args.len() > expected {
            bail!("unexpected argument '{}'", args[expected]);
        }
        Ok(parsed)
    }
}

/// One line per markup range, then one per thread.
pub fn list(text: &str) -> Vec<String> {
    let parsed = parse_document(text);
    let mut lines = Vec::new();

    for range in &parsed.ranges {
        let detail = match &range.kind {
            MarkupKind::Substitution { old, new } => {
                format!("{} -> {}", preview(old, 30), preview(new, 30))
            }
            MarkupKind::Comment { metadata: Some(m) } => {
                format!("{}: {}", m.author, preview(&range.content, 50))
            }
            _ => preview(&range.content, 60),
        };
        lines.push(format!(
            "{:>6}..{:<6} {:<12} {}",
            range.full.start,
            range.full.end,
            range.kind.name(),
            detail
        ));
    }

    for (i, thread) in parsed.threads.iter().enumerate() {
        lines.push(format!(
            "thread {i} at {}: {} comment(s)",
            thread.from(),
            thread.len()
        ));
    }

    lines
}

pub fn resolve_all(text: &str, outcome: Outcome) -> String {
    let out = apply_all(text, outcome);
    info!(
        "{outcome:?}: {} -> {} bytes, {} range(s) left",
        text.len(),
        out.len(),
        parse_document(&out).ranges.len()
    );
    out
}

/// Inserts a new comment at `offset`, which must be a char boundary inside `text`.
pub fn comment(
    text: &str,
    offset: usize,
    author: &str,
    timestamp: i64,
    content: &str,
) -> Result<String> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        bail!(
            "offset {offset} is not a character boundary in a {} byte document",
            text.len()
        );
    }
    let mut doc = Document::from_text(text);
    doc.add_comment(offset, author, timestamp, content);
    debug!("comment by {author} inserted at {offset}");
    Ok(doc.text())
}

/// Appends a reply to the `thread`-th thread (zero-based, document order).
pub fn reply(
    text: &str,
    thread: usize,
    author: &str,
    timestamp: i64,
    content: &str,
) -> Result<String> {
    let mut doc = Document::from_text(text);
    let threads = doc.threads();
    let target = threads
        .get(thread)
        .ok_or_else(|| anyhow!("no thread {thread}; document has {}", threads.len()))?;
    debug!(
        "reply by {author} to thread {thread} at {} ({} comment(s))",
        target.from(),
        target.len()
    );
    doc.reply(target, author, timestamp, content);
    Ok(doc.text())
}

/// Output of a non-interactive command run over `input`.
///
/// Rewriting commands return the whole updated document; the input file is
/// never touched.
pub fn run_batch(command: &Command, input: &str, author: &str, timestamp: i64) -> Result<String> {
    let out = match command {
        Command::View(path) => bail!("{} needs an interactive terminal", path.display()),
        Command::List(_) => list(input)
            .into_iter()
            .map(|line| line + "\n")
            .collect::<String>(),
        Command::Resolve(_, outcome) => resolve_all(input, *outcome),
        Command::Comment { offset, text, .. } => comment(input, *offset, author, timestamp, text)?,
        Command::Reply { thread, text, .. } => reply(input, *thread, author, timestamp, text)?,
    };
    Ok(out)
}

pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
