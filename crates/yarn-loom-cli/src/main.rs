use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};
use yarn_loom_config::Config;
use yarn_loom_engine::{Node, NodeAction, RopeBuffer, SearchQuery, Session, io};

/// What the one-line input box is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    AddNode,
    RenameNode,
    ToggleTags,
    Search,
}

impl Prompt {
    fn label(self) -> &'static str {
        match self {
            Prompt::AddNode => "New node title",
            Prompt::RenameNode => "Rename to",
            Prompt::ToggleTags => "Toggle tags",
            Prompt::Search => "Search",
        }
    }
}

struct Input {
    prompt: Prompt,
    value: String,
}

struct App {
    path: PathBuf,
    session: Session<RopeBuffer>,
    search: SearchQuery,
    /// Indices into the session's nodes that pass the current search.
    visible: Vec<usize>,
    list_state: ListState,
    input: Option<Input>,
    confirm_delete: bool,
    confirm_quit: bool,
    dirty: bool,
    status: String,
}

impl App {
    fn new(path: PathBuf, text: &str, auto_create_nodes: bool) -> Self {
        let session = Session::new(RopeBuffer::new(text), auto_create_nodes);
        let status = format!("Loaded {} node(s)", session.nodes().len());

        let mut app = Self {
            path,
            session,
            search: SearchQuery::default(),
            visible: Vec::new(),
            list_state: ListState::default(),
            input: None,
            confirm_delete: false,
            confirm_quit: false,
            dirty: false,
            status,
        };
        app.refresh_visible(None);
        app
    }

    fn nodes(&self) -> &[Node] {
        self.session.nodes()
    }

    fn selected_node(&self) -> Option<&Node> {
        let index = *self.visible.get(self.list_state.selected()?)?;
        self.nodes().get(index)
    }

    fn selected_title(&self) -> Option<String> {
        self.selected_node().map(|node| node.title.clone())
    }

    fn next_node(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.visible.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous_node(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Recomputes the visible list and selects `title` if it is still shown,
    /// otherwise keeps the selection index in range.
    fn refresh_visible(&mut self, title: Option<&str>) {
        self.visible = match self.search.build() {
            Ok(filter) => self
                .nodes()
                .iter()
                .enumerate()
                .filter(|(_, node)| filter.matches(node))
                .map(|(index, _)| index)
                .collect(),
            Err(e) => {
                self.status = e.to_string();
                (0..self.nodes().len()).collect()
            }
        };

        let by_title = title.and_then(|title| {
            self.visible
                .iter()
                .position(|&index| self.nodes()[index].has_title(title))
        });
        let selected = match (by_title, self.list_state.selected()) {
            (Some(i), _) => Some(i),
            _ if self.visible.is_empty() => None,
            (None, Some(i)) => Some(i.min(self.visible.len() - 1)),
            (None, None) => Some(0),
        };
        self.list_state.select(selected);
    }

    /// Dispatches `action`, re-reads the buffer and reports the outcome.
    fn apply(&mut self, action: NodeAction, select: Option<&str>, done: String) {
        match self.session.dispatch(action) {
            Ok(()) => {
                self.session.sync();
                self.dirty = true;
                self.status = done;
            }
            Err(e) => {
                log::warn!("edit failed: {e}");
                self.status = format!("Error: {e}");
            }
        }
        self.refresh_visible(select);
    }

    fn begin(&mut self, prompt: Prompt) {
        let value = match prompt {
            Prompt::RenameNode => match self.selected_title() {
                Some(title) => title,
                None => return,
            },
            Prompt::ToggleTags if self.selected_node().is_none() => return,
            Prompt::Search => self.search.text.clone(),
            _ => String::new(),
        };
        self.input = Some(Input { prompt, value });
    }

    fn submit_input(&mut self) {
        let Some(Input { prompt, value }) = self.input.take() else {
            return;
        };
        let value = value.trim().to_string();

        match prompt {
            Prompt::Search => {
                self.search.text = value;
                self.refresh_visible(None);
                self.status = format!("{} of {} node(s) match", self.visible.len(), self.nodes().len());
            }
            Prompt::AddNode => {
                let done = format!("Added '{value}'");
                self.apply(
                    NodeAction::CreateNewNode {
                        title: value.clone(),
                    },
                    Some(value.as_str()),
                    done,
                );
            }
            Prompt::RenameNode => {
                if let Some(old) = self.selected_title() {
                    let done = format!("Renamed '{old}' to '{value}'");
                    self.apply(
                        NodeAction::RenameNode {
                            node_title: old,
                            new_title: value.clone(),
                        },
                        Some(value.as_str()),
                        done,
                    );
                }
            }
            Prompt::ToggleTags => {
                if let Some(title) = self.selected_title() {
                    let done = format!("Toggled '{value}' on '{title}'");
                    self.apply(
                        NodeAction::ToggleTagOnNode {
                            node_title: title.clone(),
                            tag: value,
                        },
                        Some(title.as_str()),
                        done,
                    );
                }
            }
        }
    }

    fn delete_selected(&mut self) {
        if let Some(title) = self.selected_title() {
            let done = format!("Deleted '{title}'");
            self.apply(NodeAction::DeleteNode { node_title: title }, None, done);
        }
    }

    fn save(&mut self) -> Result<()> {
        io::write_yarn_file(&self.path, &self.session.host().text())?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        log::info!("saved {}", self.path.display());
        Ok(())
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => self.input = None,
            KeyCode::Backspace => {
                if let Some(input) = &mut self.input {
                    input.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(input) = &mut self.input {
                    input.value.push(c);
                }
            }
            _ => {}
        }
    }

    /// Handles one key press; returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.input.is_some() {
            self.handle_input_key(code);
            return false;
        }

        if self.confirm_delete {
            self.confirm_delete = false;
            if code == KeyCode::Char('y') {
                self.delete_selected();
            } else {
                self.status = "Delete cancelled".to_string();
            }
            return false;
        }

        let quitting = code == KeyCode::Char('q');
        if quitting && (!self.dirty || self.confirm_quit) {
            return true;
        }
        self.confirm_quit = false;

        match code {
            KeyCode::Char('q') => {
                self.confirm_quit = true;
                self.status = "Unsaved changes: press q again to quit, s to save".to_string();
            }
            KeyCode::Down | KeyCode::Char('j') => self.next_node(),
            KeyCode::Up | KeyCode::Char('k') => self.previous_node(),
            KeyCode::Char('a') => self.begin(Prompt::AddNode),
            KeyCode::Char('r') => self.begin(Prompt::RenameNode),
            KeyCode::Char('t') => self.begin(Prompt::ToggleTags),
            KeyCode::Char('/') => self.begin(Prompt::Search),
            KeyCode::Char('d') => {
                if let Some(title) = self.selected_title() {
                    self.confirm_delete = true;
                    self.status = format!("Delete '{title}'? y/n");
                }
            }
            KeyCode::Char('s') => {
                if let Err(e) = self.save() {
                    log::warn!("save failed: {e:#}");
                    self.status = format!("Error saving: {e}");
                }
            }
            _ => {}
        }
        false
    }

    fn render_node(node: &Node) -> Vec<String> {
        let mut lines = vec![format!("Title: {}", node.title)];
        if !node.tags.trim().is_empty() {
            lines.push(format!("Tags: {}", node.tags));
        }
        if let Some(position) = node.position {
            lines.push(format!("Position: {},{}", position.x, position.y));
        }
        if node.color_index() != 0 {
            lines.push(format!("Color: {}", node.color_index()));
        }
        if let Some(links) = &node.links {
            lines.push(format!("Links: {}", links.join(", ")));
        }
        lines.push(String::new());
        lines.extend(node.body.lines().map(str::to_string));
        lines
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);

    // stderr would draw over the terminal UI
    let log_path = Config::config_path().with_file_name("yarn-loom.log");
    if let Some(parent) = log_path.parent()
        && std::fs::create_dir_all(parent).is_ok()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path)
    {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

/// Resolves a directory argument to the first `.yarn` file inside it.
fn resolve_yarn_file(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }
    io::scan_yarn_files(path)?
        .into_iter()
        .next()
        .with_context(|| format!("no .yarn files in {}", path.display()))
}

fn main() -> Result<()> {
    init_logging();

    // Determine document path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} <file.yarn>", args[0]);
            process::exit(1);
        }
    };
    let auto_create_nodes = config.as_ref().is_none_or(|c| c.auto_create_nodes);

    let yarn_path = match (args.len(), config) {
        (2, _) => PathBuf::from(&args[1]),
        (1, Some(config)) => config.yarn_file,
        (1, None) => {
            eprintln!("Error: No yarn file provided and no config file found");
            eprintln!("Usage: {} <file.yarn>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [file.yarn]", args[0]);
            process::exit(1);
        }
    };

    let yarn_path = resolve_yarn_file(&yarn_path)?;
    let text = match io::read_yarn_file(&yarn_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Cannot open '{}': {e}", yarn_path.display());
            process::exit(1);
        }
    };
    log::info!("opening {}", yarn_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(yarn_path, &text, auto_create_nodes);

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

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key.code)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    // Node list panel
    let node_items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|&index| {
            let node = &app.nodes()[index];
            let marker = if node.links.is_some() { "→ " } else { "  " };
            ListItem::new(vec![Line::from(vec![Span::raw(format!(
                "{marker}{}",
                node.title
            ))])])
        })
        .collect();

    let title = if app.dirty { "Nodes [modified]" } else { "Nodes" };
    let nodes_list = List::new(node_items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(nodes_list, chunks[0], &mut app.list_state);

    // Content panel
    let content_text: Vec<Line> = match app.selected_node() {
        Some(node) => App::render_node(node)
            .into_iter()
            .map(|line| Line::from(vec![Span::raw(line)]))
            .collect(),
        None => vec![Line::from("Select a node to view it")],
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Node"))
        .wrap(Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    // Input line, status or instructions at the bottom
    let bottom = match &app.input {
        Some(input) => Line::from(vec![
            Span::styled(
                format!("{}: ", input.prompt.label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(input.value.clone()),
        ]),
        None => Line::from(vec![
            Span::raw(format!("{} | ", app.status)),
            Span::raw("q: Quit | ↑/k ↓/j: Move | a: Add | r: Rename | t: Tags | d: Delete | /: Search | s: Save"),
        ]),
    };

    f.render_widget(Paragraph::new(vec![bottom]).block(Block::default()), rows[1]);
}
