use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use sqlstash_config::Config;
use sqlstash_engine::{QueryRegistry, SqlFile, io};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    queries_path: PathBuf,
    sql_files: Vec<SqlFile>,
    file_list_state: ListState,
    current_content: Vec<String>,
}

impl App {
    fn new(queries_path: PathBuf) -> Result<Self> {
        let sql_files = io::scan_sql_files(&queries_path)?;

        let mut app = Self {
            queries_path,
            sql_files,
            file_list_state: ListState::default(),
            current_content: Vec::new(),
        };

        // Select first file if available
        if !app.sql_files.is_empty() {
            app.file_list_state.select(Some(0));
            app.update_content_for_selection();
        }

        Ok(app)
    }

    fn next_file(&mut self) {
        if self.sql_files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => (i + 1) % self.sql_files.len(),
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_file(&mut self) {
        if self.sql_files.is_empty() {
            return;
        }
        let i = match self.file_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.sql_files.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.file_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn update_content_for_selection(&mut self) {
        if let Some(index) = self.file_list_state.selected()
            && let Some(file) = self.sql_files.get(index)
        {
            match io::load_registry(file.relative_path(), &self.queries_path) {
                Ok(registry) => {
                    self.current_content = render_registry(&registry);
                }
                Err(e) => {
                    self.current_content = vec![format!("Error loading queries: {}", e)];
                }
            }
        }
    }
}

fn render_registry(registry: &QueryRegistry) -> Vec<String> {
    let names = registry.names();
    if names.is_empty() {
        return vec!["No named queries in this file".to_string()];
    }

    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        names.len(),
        if names.len() == 1 { "query" } else { "queries" }
    ));
    lines.push(String::new());
    for name in names {
        lines.push(format!("-- #{name}"));
        if let Some(sql) = registry.lookup(name) {
            lines.extend(sql.lines().map(|s| s.to_string()));
        }
        lines.push(String::new());
    }

    lines
}

fn main() -> Result<()> {
    // Determine queries path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let queries_path;
    let from_config;

    if args.len() == 2 {
        // CLI argument provided - use it
        queries_path = PathBuf::from(&args[1]);
        from_config = false;
    } else if args.len() == 1 {
        // No CLI argument - try config file
        match Config::load() {
            Ok(Some(config)) => {
                queries_path = config.queries_path;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No queries path provided and no config file found");
                eprintln!("Usage: {} <queries-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <queries-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [queries-folder-path]", args[0]);
        process::exit(1);
    };

    // Validate queries directory using engine
    if let Err(e) = io::validate_queries_dir(&queries_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Queries path '{}'{} is invalid: {e}",
            queries_path.display(),
            source
        );
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(queries_path)?;

    // Main loop
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

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    // Re-parse the selected file from disk
                    app.update_content_for_selection();
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(f.area());

    // File list panel
    let file_items: Vec<ListItem> = app
        .sql_files
        .iter()
        .map(|file| {
            let display_text = format!("📄 {}", file.relative_path());
            ListItem::new(vec![Line::from(vec![Span::raw(display_text)])])
        })
        .collect();

    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title("SQL Files"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Query panel
    let content_text = if app.current_content.is_empty() {
        vec![Line::from("Select a file to view its queries")]
    } else {
        app.current_content
            .iter()
            .map(|line| Line::from(vec![Span::raw(line.clone())]))
            .collect()
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Queries"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("Enter/Space: Reload"),
    ]);

    let help = Paragraph::new(vec![help_text]).block(Block::default());

    // Place help at bottom
    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    f.render_widget(help, bottom_chunk[1]);
}
