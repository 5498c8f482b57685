mod commands;

use anyhow::{Context, Result, bail};
use commands::{Command, USAGE};
use critic_margin_config::Config;
use critic_margin_engine::{
    CommentThread, Document, LayoutConfig, MarginSync, MarkupKind, MarkupRange, Outcome,
    parse_document,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

struct App {
    path: PathBuf,
    document: Document,
    sync: MarginSync,
    cursor_line: usize,
    scroll: usize,
    viewport_height: usize,
    modified: bool,
    status: String,
}

impl App {
    fn new(path: PathBuf, layout: LayoutConfig) -> Result<Self> {
        let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let document = Document::from_bytes(&bytes)?;

        let mut app = Self {
            path,
            document,
            sync: MarginSync::new(layout),
            cursor_line: 0,
            scroll: 0,
            viewport_height: 0,
            modified: false,
            status: String::new(),
        };
        app.sync_scroll();
        Ok(app)
    }

    fn line_count(&self) -> usize {
        self.document.line_of_offset(self.document.len()) + 1
    }

    /// Furthest the document pane may scroll, including the padding the
    /// margin asks for so the last card can be reached.
    fn max_scroll(&self) -> usize {
        let total = self.line_count() + self.sync.layout().editor_padding.ceil() as usize;
        total.saturating_sub(self.viewport_height)
    }

    fn sync_scroll(&mut self) {
        self.sync.on_scroll(self.scroll as f64, self.line_count() as f64);
    }

    fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        self.keep_cursor_visible();
    }

    fn move_cursor(&mut self, delta: isize) {
        let last = self.line_count().saturating_sub(1);
        self.cursor_line = self.cursor_line.saturating_add_signed(delta).min(last);
        self.keep_cursor_visible();
    }

    /// Scrolls the viewport and pulls the cursor along into it.
    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        let last = self.line_count().saturating_sub(1);
        let bottom = (self.scroll + self.viewport_height.max(1) - 1).min(last);
        self.cursor_line = self.cursor_line.clamp(self.scroll.min(last), bottom);
        self.sync_scroll();
    }

    fn page(&mut self, direction: isize) {
        let step = self.viewport_height.max(1) as isize;
        self.scroll_by(step * direction);
    }

    fn keep_cursor_visible(&mut self) {
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        } else if self.viewport_height > 0 && self.cursor_line >= self.scroll + self.viewport_height
        {
            self.scroll = self.cursor_line + 1 - self.viewport_height;
        }
        self.sync_scroll();
    }

    /// Byte range of the cursor line, without its newline.
    fn cursor_line_bounds(&self) -> std::ops::Range<usize> {
        let text = self.document.text();
        let mut start = 0;
        for (i, line) in text.split('\n').enumerate() {
            if i == self.cursor_line {
                return start..start + line.len();
            }
            start += line.len() + 1;
        }
        text.len()..text.len()
    }

    fn range_under_cursor(&self) -> Option<MarkupRange> {
        let bounds = self.cursor_line_bounds();
        self.document
            .ranges()
            .into_iter()
            .find(|r| r.full.start <= bounds.end && r.full.end > bounds.start)
    }

    fn resolve_at_cursor(&mut self, outcome: Outcome) {
        let Some(range) = self.range_under_cursor() else {
            self.status = "No markup on this line".to_string();
            return;
        };
        self.document.resolve(&range, outcome);
        self.modified = true;
        self.status = format!("{outcome:?}ed {}", range.kind.name());

        self.sync.invalidate();
        self.move_cursor(0);
    }

    fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.document.to_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.modified = false;
        self.status = format!("Saved {}", self.path.display());
        Ok(())
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let command = match Command::parse(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    match command {
        Command::View(path) => view(path, layout_config(&config)),
        batch => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .init();
            run_batch(batch, &config)
        }
    }
}

fn layout_config(config: &Config) -> LayoutConfig {
    LayoutConfig {
        gap: config.layout.gap,
        padding: config.layout.padding,
        default_card_height: config.layout.default_card_height,
    }
}

fn run_batch(command: Command, config: &Config) -> Result<()> {
    let path = match &command {
        Command::View(path) => bail!("{} needs an interactive terminal", path.display()),
        Command::List(path)
        | Command::Resolve(path, _)
        | Command::Comment { path, .. }
        | Command::Reply { path, .. } => path,
    };
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    info!("read {} ({} bytes)", path.display(), input.len());

    let output = commands::run_batch(&command, &input, &config.author, commands::now_millis())?;
    print!("{output}");
    Ok(())
}

fn view(path: PathBuf, layout: LayoutConfig) -> Result<()> {
    let mut app = App::new(path, layout)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
                KeyCode::PageDown => app.page(1),
                KeyCode::PageUp => app.page(-1),
                KeyCode::Char('a') => app.resolve_at_cursor(Outcome::Accept),
                KeyCode::Char('r') => app.resolve_at_cursor(Outcome::Reject),
                KeyCode::Char('w') => {
                    if let Err(e) = app.save() {
                        app.status = format!("Save failed: {e}");
                    }
                }
                _ => {}
            }
        }
    }
}

fn kind_style(kind: &MarkupKind) -> Style {
    match kind {
        MarkupKind::Addition => Style::default().fg(Color::Green),
        MarkupKind::Deletion => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::CROSSED_OUT),
        MarkupKind::Substitution { .. } => Style::default().fg(Color::Yellow),
        MarkupKind::Highlight => Style::default().bg(Color::Yellow).fg(Color::Black),
        MarkupKind::Comment { .. } => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::DIM),
    }
}

/// Splits one document line into plain and markup-styled segments.
fn styled_line<'a>(line: &'a str, line_start: usize, ranges: &[MarkupRange]) -> Line<'a> {
    let line_end = line_start + line.len();
    let mut spans = Vec::new();
    let mut at = line_start;

    for range in ranges
        .iter()
        .filter(|r| r.full.start < line_end && r.full.end > line_start)
    {
        let start = range.full.start.max(line_start);
        let end = range.full.end.min(line_end);
        if start > at {
            spans.push(Span::raw(&line[at - line_start..start - line_start]));
        }
        spans.push(Span::styled(
            &line[start - line_start..end - line_start],
            kind_style(&range.kind),
        ));
        at = end;
    }
    if at < line_end {
        spans.push(Span::raw(&line[at - line_start..]));
    }
    Line::from(spans)
}

/// Char-count wrapping; good enough for a terminal margin.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

fn card_lines(thread: &CommentThread, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for comment in &thread.comments {
        let author = comment
            .metadata()
            .map_or("anonymous".to_string(), |m| m.author.clone());
        lines.push(Line::from(Span::styled(
            author,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(wrap(&comment.content, width).into_iter().map(Line::from));
    }
    lines
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[0]);

    app.set_viewport_height(panes[0].height.saturating_sub(2) as usize);

    let text = app.document.text();
    let parsed = parse_document(&text);

    // Document panel
    let mut line_start = 0;
    let mut doc_lines = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        let mut styled = styled_line(line, line_start, &parsed.ranges);
        if i == app.cursor_line {
            styled = styled.style(Style::default().bg(Color::DarkGray));
        }
        doc_lines.push(styled);
        line_start += line.len() + 1;
    }
    let title = format!(
        "{}{}",
        app.path.display(),
        if app.modified { " [+]" } else { "" }
    );
    let document = Paragraph::new(doc_lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.scroll as u16, 0));
    f.render_widget(document, panes[0]);

    // Margin panel: measure, lay out, then draw the visible cards
    let margin_block = Block::default().borders(Borders::ALL).title("Comments");
    let inner = margin_block.inner(panes[1]);
    f.render_widget(margin_block, panes[1]);

    let card_width = inner.width.saturating_sub(2) as usize;
    let cards: Vec<(usize, Vec<Line>)> = parsed
        .threads
        .iter()
        .map(|t| (t.from(), card_lines(t, card_width)))
        .collect();
    for (root, lines) in &cards {
        app.sync.on_card_resize(*root, (lines.len() + 2) as f64);
    }
    app.sync
        .relayout_if_dirty(&parsed.threads, &app.document.line_mapper());

    let scroll = app.sync.scroll_top();
    let viewport = f64::from(inner.height);
    for card in app.sync.visible_cards(viewport) {
        let Some((_, lines)) = cards.iter().find(|(root, _)| *root == card.root) else {
            continue;
        };
        let top = card.layout_y - scroll;
        let bottom = card.bottom() - scroll;
        let visible_top = top.max(0.0);
        let visible_bottom = bottom.min(viewport);
        if visible_bottom <= visible_top {
            continue;
        }

        let mut borders = Borders::LEFT | Borders::RIGHT;
        if top >= 0.0 {
            borders |= Borders::TOP;
        }
        if bottom <= viewport {
            borders |= Borders::BOTTOM;
        }
        let skip = if top < 0.0 { (-top - 1.0) as u16 } else { 0 };

        let area = Rect::new(
            inner.x,
            inner.y + visible_top as u16,
            inner.width,
            (visible_bottom - visible_top) as u16,
        );
        let card_widget = Paragraph::new(lines.clone())
            .block(Block::default().borders(borders))
            .scroll((skip, 0));
        f.render_widget(card_widget, area);
    }

    // Status line
    let help = "q: Quit | ↑/↓ PgUp/PgDn: Scroll | a: Accept | r: Reject | w: Save";
    let status = if app.status.is_empty() {
        help.to_string()
    } else {
        format!("{} | {help}", app.status)
    };
    f.render_widget(Paragraph::new(Line::from(status)), rows[1]);
}
