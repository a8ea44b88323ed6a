//! Top-level application state and the main event loop.
//!
//! [`AppState`] holds everything the screen shows and reacts to
//! [`AppEvent`]s without touching the terminal, so it can be driven from
//! tests. [`App::run`] sets up the terminal, drives the crossterm event loop,
//! feeds finished loads back into the state, and tears everything down
//! cleanly on exit or panic.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        json_tree::{device_pointer, JsonTree, JsonTreeState, FULL_DEPTH},
        match_panel::{MatchPanel, MatchPanelState},
        query_bar::{QueryBar, QueryBarState},
        status_bar::{StatusBar, StatusInfo},
    },
};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use invex_core::{config::Config, filter, FilterOutcome, Inventory};
use invex_sources::{Source, SourceWatcher};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::{io, time::Duration};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Matches,
    QueryBar,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub source: Source,
    pub config: Config,
    pub theme: Theme,
    /// The most recently loaded document, as received.
    pub document: Value,
    pub inventory: Inventory,
    /// Outcome of the last search; `None` while the inventory itself is shown.
    pub outcome: Option<FilterOutcome>,
    pub tree: JsonTreeState,
    pub matches: MatchPanelState,
    pub query: QueryBarState,
    pub command_bar: CommandBarState,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub show_help: bool,
    pub quit: bool,
    /// A fetch is in flight.
    pub loading: bool,
    /// Start a fetch as soon as none is in flight.
    pub reload_requested: bool,
    pub loaded_at: Option<DateTime<Local>>,
    /// Transient status-bar message.
    pub message: Option<String>,
}

impl AppState {
    /// Fresh state with an empty inventory and the first load requested.
    pub fn new(source: Source, config: Config, theme: Theme) -> Self {
        let mut tree = JsonTreeState::new(config.ui.values_per_row);
        let document = Value::Object(Map::new());
        tree.set_document("Inventory", &document, FULL_DEPTH);

        Self {
            source,
            config,
            theme,
            document,
            inventory: Inventory::empty(),
            outcome: None,
            tree,
            matches: MatchPanelState::default(),
            query: QueryBarState::default(),
            command_bar: CommandBarState::default(),
            focus: Focus::Tree,
            prev_focus: Focus::Tree,
            show_help: false,
            quit: false,
            loading: false,
            reload_requested: true,
            loaded_at: None,
            message: None,
        }
    }

    /// Install a freshly loaded document. An active search is re-run against
    /// it so the view stays on the same query.
    pub fn apply_load(&mut self, doc: Value) {
        self.inventory = Inventory::from(&doc);
        self.document = doc;
        self.loading = false;
        self.loaded_at = Some(Local::now());
        tracing::info!(
            devices = self.inventory.device_count(),
            characteristics = self.inventory.characteristic_count(),
            "inventory installed"
        );

        if self.outcome.is_some() {
            self.run_search();
        } else {
            self.show_inventory();
        }
    }

    /// Run the query bar's text over the loaded inventory and show the result.
    pub fn run_search(&mut self) {
        let query = self.query.query.clone();
        let outcome = filter(&query, &self.inventory);
        tracing::info!(
            query = %query,
            total_matches = outcome.total_matches,
            "search finished"
        );

        self.tree
            .set_document(format!("Result: {query}"), &outcome.result.to_value(), FULL_DEPTH);
        self.tree.highlight = (!query.is_empty()).then(|| query.to_lowercase());
        self.matches.set_outcome(&query, &outcome);
        self.message = Some(format!("{} matches", outcome.total_matches));
        self.outcome = Some(outcome);
    }

    /// Drop the search and show the whole inventory again.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.outcome = None;
        self.message = None;
        self.show_inventory();
    }

    /// `q`: leave the search view first, exit when already on the inventory.
    pub fn quit_or_leave_search(&mut self) {
        if self.outcome.is_some() {
            tracing::debug!("leaving search view");
            self.clear_search();
        } else {
            tracing::debug!("quit");
            self.quit = true;
        }
    }

    /// Ask for a new fetch. Stdin can only be read once.
    pub fn request_reload(&mut self) -> Result<(), String> {
        if self.source == Source::Stdin && self.loaded_at.is_some() {
            return Err("stdin cannot be reloaded".to_string());
        }
        tracing::debug!(source = %self.source, "reload requested");
        self.reload_requested = true;
        Ok(())
    }

    fn show_inventory(&mut self) {
        self.tree.set_document("Inventory", &self.document, FULL_DEPTH);
        self.tree.highlight = None;
    }

    /// Snapshot for the status bar.
    pub fn status_info(&self) -> StatusInfo {
        StatusInfo {
            source: self.source.to_string(),
            loaded_at: self
                .loaded_at
                .map(|at| format_time(&at, &self.config.ui.timestamp_format)),
            devices: self.inventory.device_count(),
            characteristics: self.inventory.characteristic_count(),
            loading: self.loading,
            message: self.message.clone(),
        }
    }

    /// React to one event.
    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            self.handle_command_mode(event);
            return;
        }

        match event {
            // Toggle help (only when not typing in the query bar)
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }

            // Enter command mode with `:` (not from the query bar)
            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::Quit => self.quit_or_leave_search(),

            // Return focus from query bar
            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    tracing::debug!("focus: QueryBar -> Tree");
                    self.focus = Focus::Tree;
                }
            }

            // Tab-cycle focus: Tree → Matches → QueryBar → Tree
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Tree => Focus::Matches,
                    Focus::Matches => Focus::QueryBar,
                    Focus::QueryBar | Focus::Command => Focus::Tree,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }

            AppEvent::QueryFocus => {
                tracing::debug!("focus -> QueryBar");
                self.focus = Focus::QueryBar;
            }

            AppEvent::Collapse => {
                self.tree.show_to_depth(self.config.ui.collapsed_depth);
            }
            AppEvent::Expand => self.tree.show_to_depth(FULL_DEPTH),
            AppEvent::Reload => {
                if let Err(msg) = self.request_reload() {
                    self.message = Some(msg);
                }
            }

            AppEvent::Enter if self.focus == Focus::QueryBar => self.run_search(),

            AppEvent::Enter if self.focus == Focus::Matches => {
                if let Some(id) = self.matches.selected().map(device_pointer) {
                    if self.tree.reveal(&id) {
                        self.focus = Focus::Tree;
                    }
                }
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => self.dispatch_to_focused(other),
        }
    }

    fn handle_command_mode(&mut self, event: AppEvent) {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
            }
            AppEvent::Enter => {
                let input = self.command_bar.input.clone();
                match Command::parse(&input) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        if let Err(msg) = execute_command(self, cmd) {
                            self.message = Some(msg);
                        }
                    }
                    Err(msg) if msg.is_empty() => {
                        // Empty input — just close
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        self.command_bar.error = Some(msg);
                    }
                }
            }
            other => self.command_bar.handle(&other),
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.focus {
            Focus::Tree => self.tree.handle(&event),
            Focus::Matches => self.matches.handle(&event),
            Focus::QueryBar => self.query.handle(&event),
            Focus::Command => {} // handled before dispatch, should not reach here
        }
    }
}

/// Format with a user-supplied strftime string, falling back to RFC 3339 when
/// the format is invalid.
fn format_time(at: &DateTime<Local>, fmt: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", at.format(fmt)) {
        Ok(()) => out,
        Err(_) => at.to_rfc3339(),
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    runtime: Handle,
    loads_tx: UnboundedSender<Value>,
    loads_rx: UnboundedReceiver<Value>,
    /// Change signals from the file watcher, when one is running.
    changes: Option<UnboundedReceiver<()>>,
    _watcher: Option<SourceWatcher>,
}

impl App {
    /// `runtime` runs the fetches; the event loop itself stays on the
    /// calling thread.
    pub fn new(state: AppState, runtime: Handle) -> Self {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let mut app = App {
            state,
            runtime,
            loads_tx,
            loads_rx,
            changes: None,
            _watcher: None,
        };
        app.start_watch();
        app
    }

    fn start_watch(&mut self) {
        if !self.state.config.source.watch {
            return;
        }
        let Some(path) = self.state.source.local_path() else {
            return;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        match invex_sources::watch(path, tx) {
            Ok(watcher) => {
                self.changes = Some(rx);
                self._watcher = Some(watcher);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot watch source");
            }
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.pump_loads();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key)
                        if key.kind == crossterm::event::KeyEventKind::Press =>
                    {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(
                                focus = ?self.state.focus,
                                event = ?ev,
                                "key event"
                            );
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Install finished loads, turn file changes into reloads, and start a
    /// fetch when one is wanted and none is running.
    fn pump_loads(&mut self) {
        while let Ok(doc) = self.loads_rx.try_recv() {
            self.state.apply_load(doc);
        }

        if let Some(changes) = &mut self.changes {
            let mut changed = false;
            while changes.try_recv().is_ok() {
                changed = true;
            }
            if changed {
                tracing::debug!("source changed on disk");
                self.state.reload_requested = true;
            }
        }

        if self.state.reload_requested && !self.state.loading {
            self.state.reload_requested = false;
            self.state.loading = true;
            self.spawn_load();
        }
    }

    fn spawn_load(&self) {
        let source = self.state.source.clone();
        let timeout = Duration::from_millis(self.state.config.source.timeout_ms);
        let tx = self.loads_tx.clone();
        tracing::info!(source = %source, "loading inventory");
        self.runtime.spawn(async move {
            let doc = source.load_or_empty(timeout).await;
            let _ = tx.send(doc);
        });
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    if area.is_empty() {
        return;
    }

    // Vertical: 1-line status bar | body | 3-line query bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    // Horizontal body split
    let pct = state.config.ui.tree_pane_width_pct.min(100);
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([Constraint::Percentage(pct), Constraint::Fill(1)])
        .split(vert[1]);

    let status = state.status_info();
    frame.render_widget(StatusBar::new(&status, &state.theme), vert[0]);
    frame.render_widget(
        JsonTree::new(&state.tree, state.focus == Focus::Tree, &state.theme),
        horiz[0],
    );
    frame.render_widget(
        MatchPanel::new(&state.matches, state.focus == Focus::Matches, &state.theme),
        horiz[1],
    );
    frame.render_widget(
        QueryBar::new(&state.query, state.focus == Focus::QueryBar, &state.theme),
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: area.height.min(1), ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return; // cursor is set; skip query-bar cursor below
    }

    // Position the terminal cursor when the query bar is focused
    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, true, &state.theme);
        let (cx, cy) = qb.cursor_position(vert[2]);
        frame.set_cursor_position((cx, cy));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
