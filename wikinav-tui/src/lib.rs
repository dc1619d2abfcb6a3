pub mod feed;

pub use feed::{IndexMessage, create_index_channel};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use wikinav_core::highlight::{Segment, SegmentStyle};
use wikinav_core::{MenuRow, NavigationTarget, SearchOverlay};
use wikinav_index::{ArticleIndex, ArticleRecord};

const DEFAULT_PROMPT: &str = "search> ";

/// State of the interactive search box.
pub struct App {
    overlay: SearchOverlay,
    prompt: String,
    input: String,
    cursor_position: usize,
    rows: Vec<MenuRow>,
    selected: Option<usize>,
    status: Option<String>,
    should_quit: bool,
    target: Option<NavigationTarget>,
}

impl App {
    pub fn new(overlay: SearchOverlay) -> Self {
        Self {
            overlay,
            prompt: DEFAULT_PROMPT.to_string(),
            input: String::new(),
            cursor_position: 0,
            rows: Vec::new(),
            selected: None,
            status: None,
            should_quit: false,
            target: None,
        }
    }

    /// Label the prompt after the search box element, e.g. `#tags> `.
    pub fn with_search_box(mut self, search_box_id: &str) -> Self {
        if !search_box_id.is_empty() {
            self.prompt = format!("#{}> ", search_box_id);
        }
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    /// Index into `rows` of the highlighted item. Never a header.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn target(&self) -> Option<&NavigationTarget> {
        self.target.as_ref()
    }

    pub fn into_target(self) -> Option<NavigationTarget> {
        self.target
    }

    pub fn selected_record(&self) -> Option<&ArticleRecord> {
        match self.rows.get(self.selected?)? {
            MenuRow::Item(item) => self.overlay.record(item.position),
            MenuRow::Header(_) => None,
        }
    }

    /// Apply the outcome of the background load.
    pub fn receive(&mut self, message: IndexMessage) {
        match message {
            IndexMessage::Loaded(index) => {
                debug!("Search box received {} records", index.len());
                self.status = None;
                self.overlay.install(index);
            }
            IndexMessage::Failed(reason) => {
                self.status = Some(format!("Index unavailable: {}", reason));
                self.overlay.install(ArticleIndex::empty());
            }
        }
        self.refresh();
    }

    /// Drain pending messages without blocking.
    pub fn process_messages(&mut self, rx: &mut mpsc::UnboundedReceiver<IndexMessage>) {
        while let Ok(message) = rx.try_recv() {
            self.receive(message);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor_position);
                self.input.insert(at, c);
                self.cursor_position += 1;
                self.refresh();
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    let at = self.byte_index(self.cursor_position - 1);
                    self.input.remove(at);
                    self.cursor_position -= 1;
                    self.refresh();
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.input.chars().count() {
                    let at = self.byte_index(self.cursor_position);
                    self.input.remove(at);
                    self.refresh();
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count());
            }
            KeyCode::Home => {
                self.cursor_position = 0;
            }
            KeyCode::End => {
                self.cursor_position = self.input.chars().count();
            }
            KeyCode::Up => self.select_previous(),
            KeyCode::Down | KeyCode::Tab => self.select_next(),
            KeyCode::Enter => self.open_selection(),
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn refresh(&mut self) {
        self.rows = self.overlay.render(&self.input);
        self.selected = self.rows.iter().position(is_item);
    }

    fn select_next(&mut self) {
        let start = self.selected.map_or(0, |i| i + 1);
        if let Some(offset) = self.rows.iter().skip(start).position(is_item) {
            self.selected = Some(start + offset);
        }
    }

    fn select_previous(&mut self) {
        let Some(current) = self.selected else {
            return;
        };
        if let Some(previous) = self.rows[..current].iter().rposition(is_item) {
            self.selected = Some(previous);
        }
    }

    fn open_selection(&mut self) {
        let Some(record) = self.selected_record().cloned() else {
            return;
        };

        let mut target = None;
        let navigated = self
            .overlay
            .select(&record, &mut |t: &NavigationTarget| target = Some(t.clone()));

        if navigated {
            self.target = target;
            self.should_quit = true;
        } else {
            self.status = Some(format!("No page known for '{}'", record.name));
        }
    }
}

fn is_item(row: &MenuRow) -> bool {
    matches!(row, MenuRow::Item(_))
}

/// Run the search box until the user picks a page or quits. The index
/// arrives on `rx` while the box is already accepting input.
pub fn run(
    overlay: SearchOverlay,
    search_box_id: &str,
    mut rx: mpsc::UnboundedReceiver<IndexMessage>,
) -> Result<Option<NavigationTarget>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(overlay).with_search_box(search_box_id);
    let result = run_app(&mut terminal, &mut app, &mut rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|_| app.into_target())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<IndexMessage>,
) -> Result<()> {
    loop {
        app.process_messages(rx);
        terminal.draw(|f| ui(f, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }

    Ok(())
}

fn segment_span(segment: &Segment) -> Span<'static> {
    let style = match segment.style {
        SegmentStyle::Plain => Style::default(),
        SegmentStyle::Emphasis => Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED),
        SegmentStyle::Italic => Style::default().add_modifier(Modifier::ITALIC),
    };
    Span::styled(segment.text.clone(), style)
}

fn row_item(row: &MenuRow) -> ListItem<'static> {
    match row {
        MenuRow::Header(category) => ListItem::new(Line::from(Span::styled(
            format!("── {} ──", category),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        MenuRow::Item(item) => {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(item.segments.iter().map(segment_span));
            ListItem::new(Line::from(spans))
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Rule
            Constraint::Min(1),    // Suggestions
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    let input = Paragraph::new(format!("{}{}", app.prompt, app.input))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(input, chunks[0]);

    let typed: String = app.input.chars().take(app.cursor_position).collect();
    f.set_cursor_position((
        chunks[0].x + (app.prompt.chars().count() + typed.chars().count()) as u16,
        chunks[0].y,
    ));

    let rule = Paragraph::new("─".repeat(chunks[1].width as usize))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(rule, chunks[1]);

    if !app.overlay.is_ready() {
        let loading = Paragraph::new("Loading index...").style(Style::default().fg(Color::DarkGray));
        f.render_widget(loading, chunks[2]);
    } else {
        let items: Vec<ListItem> = app.rows.iter().map(row_item).collect();
        let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray));
        let mut state = ListState::default().with_selected(app.selected);
        f.render_stateful_widget(list, chunks[2], &mut state);
    }

    let item_count = app.rows.iter().filter(|row| is_item(row)).count();
    let status = match app.status {
        Some(ref message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::raw(format!("{} suggestions | ", item_count)),
            Span::styled("↑↓", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" select | "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" open | "),
            Span::styled("ESC", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]),
    };
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use wikinav_core::{CategoryStrategy, PlainStrategy};
    use wikinav_index::PageDepth;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn sample_index() -> ArticleIndex {
        ArticleIndex::new(vec![
            ArticleRecord::new("Home", "index.html"),
            ArticleRecord::new("Homepage layout", "articles/article_homepage.html"),
            ArticleRecord::titled("Home", "Home sweet home", "sweet", "index.html"),
        ])
    }

    fn categorized_app(depth: PageDepth) -> App {
        let overlay =
            SearchOverlay::new(Box::new(CategoryStrategy), depth).with_index(sample_index());
        App::new(overlay)
    }

    fn buffer_to_string(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut output = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                output.push_str(buffer[(x, y)].symbol());
            }
            output.push('\n');
        }
        output
    }

    #[test]
    fn typing_filters_and_selects_first_item() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "home");

        assert_eq!(app.input(), "home");
        assert!(matches!(app.rows()[0], MenuRow::Header(_)));
        assert_eq!(app.selected(), Some(1));
        assert_eq!(app.selected_record().map(|r| r.name.as_str()), Some("Home"));
    }

    #[test]
    fn down_skips_headers() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "home");

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), Some(2));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), Some(4));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), Some(4));

        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected(), Some(1));
    }

    #[test]
    fn backspace_widens_results() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "homep");
        let narrow = app.rows().len();

        app.handle_key(key(KeyCode::Backspace));

        assert_eq!(app.input(), "home");
        assert!(app.rows().len() > narrow);
    }

    #[test]
    fn cursor_edits_in_the_middle() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "hme");
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Char('o')));

        assert_eq!(app.input(), "home");
    }

    #[test]
    fn enter_resolves_and_quits() {
        let mut app = categorized_app(PageDepth::Article);
        type_text(&mut app, "sweet");
        app.handle_key(key(KeyCode::Enter));

        assert!(app.should_quit());
        assert_eq!(
            app.target().map(|t| t.to_string()),
            Some("../index.html#sweet".to_string())
        );
    }

    #[test]
    fn enter_without_selection_does_nothing() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "zzz");
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.should_quit());
        assert!(app.target().is_none());
    }

    #[test]
    fn escape_quits_without_target() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "home");
        app.handle_key(key(KeyCode::Esc));

        assert!(app.should_quit());
        assert!(app.into_target().is_none());
    }

    #[test]
    fn late_index_applies_to_current_input() {
        let overlay = SearchOverlay::new(Box::new(PlainStrategy), PageDepth::Root);
        let mut app = App::new(overlay);
        let (tx, mut rx) = create_index_channel();

        type_text(&mut app, "home");
        assert!(app.rows().is_empty());

        tx.send(IndexMessage::Loaded(sample_index())).unwrap();
        app.process_messages(&mut rx);

        assert_eq!(app.rows().len(), 3);
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn failed_load_leaves_box_empty() {
        let overlay = SearchOverlay::new(Box::new(PlainStrategy), PageDepth::Root);
        let mut app = App::new(overlay);

        app.receive(IndexMessage::Failed("connection refused".to_string()));
        type_text(&mut app, "home");

        assert!(app.rows().is_empty());
        assert!(app.status.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn draws_prompt_headers_and_items() {
        let mut app = categorized_app(PageDepth::Root);
        type_text(&mut app, "home");

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();
        let screen = buffer_to_string(&terminal);

        assert!(screen.contains("search> home"));
        assert!(screen.contains("── articles ──"));
        assert!(screen.contains("Homepage layout"));
        assert!(screen.contains("Home : Home sweet home"));
    }

    #[test]
    fn prompt_names_the_search_box() {
        let mut app = categorized_app(PageDepth::Root).with_search_box("tags");
        type_text(&mut app, "home");
        assert_eq!(app.prompt(), "#tags> ");

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();

        assert!(buffer_to_string(&terminal).contains("#tags> home"));
        assert_eq!(
            categorized_app(PageDepth::Root).with_search_box("").prompt(),
            "search> "
        );
    }

    #[test]
    fn draws_loading_message_while_pending() {
        let app = App::new(SearchOverlay::new(
            Box::new(PlainStrategy),
            PageDepth::Root,
        ));

        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();

        assert!(buffer_to_string(&terminal).contains("Loading index..."));
    }
}
