// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! Provides the interactive editor shell (ratatui + crossterm), including a
//! built-in demo document. All document mutations go through the op layer;
//! layout and saving run off the input thread and report back through a
//! channel drained once per frame.

use std::{
    error::Error,
    io,
    sync::{mpsc, Arc},
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::debug;

use crate::layout::{
    apply_assignment, snapshot_graph, LayeredEngine, LayoutAssignment, LayoutEngine, LayoutError,
    LayoutGraph,
};
use crate::model::{MapId, MindMap, NodeId, NodeKind};
use crate::ops::{self, Op};
use crate::store::{RemoteStore, StoreError, UpdateMapRequest};

const SELECTED_COLOR: Color = Color::LightGreen;
const ROOT_MARKER: &str = "◆";
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TOAST_COLOR: Color = Color::Yellow;
const CANVAS_X_SCALE: f64 = 10.0;
const CANVAS_Y_SCALE: f64 = 30.0;
const CANVAS_MAX_COLS: usize = 400;
const CANVAS_MAX_ROWS: usize = 200;
const LABEL_MAX_CHARS: usize = 24;

/// Runs the interactive editor on the built-in demo document, without a
/// remote store.
pub fn run() -> Result<(), Box<dyn Error>> {
    run_with_map(demo_document())
}

/// Runs the editor on `map` without a remote store; saving is disabled.
pub fn run_with_map(map: MindMap) -> Result<(), Box<dyn Error>> {
    run_editor(map, None)
}

/// Runs the editor on `map`, saving through `store` on the given runtime.
pub fn run_with_store(
    map: MindMap,
    store: Arc<dyn RemoteStore>,
    handle: tokio::runtime::Handle,
) -> Result<(), Box<dyn Error>> {
    run_editor(map, Some((store, handle)))
}

fn run_editor(
    map: MindMap,
    store: Option<(Arc<dyn RemoteStore>, tokio::runtime::Handle)>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = EditorApp::new(map, store.is_some());
    let (events_tx, events_rx) = mpsc::channel::<BackgroundEvent>();

    while !app.should_quit {
        while let Ok(background) = events_rx.try_recv() {
            app.handle_background(background);
        }
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        for effect in app.take_effects() {
            dispatch_effect(effect, store.as_ref(), &events_tx);
        }
    }

    Ok(())
}

/// Work the editor asked for but must not block on. Layout runs on a plain
/// thread; saving runs on the store's async runtime. Both report back as a
/// [`BackgroundEvent`].
#[derive(Debug)]
enum Effect {
    Layout {
        generation: u64,
        graph: LayoutGraph,
    },
    Save {
        map_id: MapId,
        request: UpdateMapRequest,
    },
}

enum BackgroundEvent {
    Layout {
        generation: u64,
        result: Result<LayoutAssignment, LayoutError>,
    },
    Save {
        result: Result<(), StoreError>,
    },
}

fn dispatch_effect(
    effect: Effect,
    store: Option<&(Arc<dyn RemoteStore>, tokio::runtime::Handle)>,
    events_tx: &mpsc::Sender<BackgroundEvent>,
) {
    match effect {
        Effect::Layout { generation, graph } => {
            let events_tx = events_tx.clone();
            std::thread::spawn(move || {
                let result = LayeredEngine::default().layout(&graph);
                let _ = events_tx.send(BackgroundEvent::Layout { generation, result });
            });
        }
        Effect::Save { map_id, request } => {
            let Some((store, handle)) = store else {
                return;
            };
            let store = Arc::clone(store);
            let events_tx = events_tx.clone();
            handle.spawn(async move {
                debug!(map = %map_id, "saving document");
                let result = store.update(&map_id, &request).await.map(|_| ());
                let _ = events_tx.send(BackgroundEvent::Save { result });
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Normal,
    /// Editing the selected node's label in place.
    EditLabel { node_id: NodeId, buffer: String },
    /// Typing the label of a child about to be created under the selection.
    DraftChild { buffer: String },
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct EditorApp {
    map: MindMap,
    selected: Option<NodeId>,
    mode: Mode,
    draft_kind: NodeKind,
    connect_source: Option<NodeId>,
    layout_generation: u64,
    save_in_flight: bool,
    dirty: bool,
    has_store: bool,
    toast: Option<Toast>,
    pending_effects: Vec<Effect>,
    should_quit: bool,
}

impl EditorApp {
    fn new(map: MindMap, has_store: bool) -> Self {
        let selected = map.root_id().cloned();
        Self {
            map,
            selected,
            mode: Mode::Normal,
            draft_kind: NodeKind::Text,
            connect_source: None,
            layout_generation: 0,
            save_in_flight: false,
            dirty: false,
            has_store,
            toast: None,
            pending_effects: Vec::new(),
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode.clone() {
            Mode::Normal => {
                if self.handle_normal_key(key.code) {
                    self.should_quit = true;
                }
            }
            Mode::EditLabel { node_id, buffer } => {
                self.handle_edit_label_key(key.code, node_id, buffer);
            }
            Mode::DraftChild { buffer } => {
                self.handle_draft_child_key(key.code, buffer);
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.connect_source.take().is_some() {
                    self.set_toast("Connect cancelled");
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('t') => self.cycle_draft_kind(),
            KeyCode::Char('n') => self.start_draft_child(),
            KeyCode::Tab | KeyCode::Insert => self.add_child(NodeKind::Text, None),
            KeyCode::Char('e') => self.start_edit_label(),
            KeyCode::Char('d') | KeyCode::Delete | KeyCode::Backspace => self.delete_selected(),
            KeyCode::Char('c') => self.connect_step(),
            KeyCode::Char('s') => self.request_save(),
            KeyCode::Char('L') => self.request_layout(),
            _ => {}
        }
        false
    }

    fn handle_edit_label_key(&mut self, code: KeyCode, node_id: NodeId, mut buffer: String) {
        match code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.apply(Op::RenameNode {
                    node_id,
                    label: buffer,
                });
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::EditLabel { node_id, buffer };
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                self.mode = Mode::EditLabel { node_id, buffer };
            }
            _ => self.mode = Mode::EditLabel { node_id, buffer },
        }
    }

    fn handle_draft_child_key(&mut self, code: KeyCode, mut buffer: String) {
        match code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let label = if buffer.trim().is_empty() {
                    None
                } else {
                    Some(buffer)
                };
                self.add_child(self.draft_kind, label);
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                buffer.pop();
                self.mode = Mode::DraftChild { buffer };
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                self.mode = Mode::DraftChild { buffer };
            }
            _ => self.mode = Mode::DraftChild { buffer },
        }
    }

    fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending_effects)
    }

    fn handle_background(&mut self, background: BackgroundEvent) {
        match background {
            BackgroundEvent::Layout { generation, result } => {
                self.on_layout_result(generation, result);
            }
            BackgroundEvent::Save { result } => self.on_save_result(result),
        }
    }

    /// Applies a finished layout run unless a newer request superseded it.
    fn on_layout_result(
        &mut self,
        generation: u64,
        result: Result<LayoutAssignment, LayoutError>,
    ) {
        if generation != self.layout_generation {
            debug!(generation, current = self.layout_generation, "discarding stale layout");
            return;
        }
        match result {
            Ok(assignment) => {
                apply_assignment(&mut self.map, &assignment);
                self.dirty = true;
                self.set_toast("Layout updated");
            }
            Err(err) => self.set_toast(format!("Layout failed: {err}")),
        }
    }

    fn on_save_result(&mut self, result: Result<(), StoreError>) {
        self.save_in_flight = false;
        match result {
            Ok(()) => {
                self.dirty = false;
                self.set_toast("Saved");
            }
            Err(err) => self.set_toast(format!("Save failed: {err}")),
        }
    }

    fn node_order(&self) -> Vec<NodeId> {
        self.map.nodes().keys().cloned().collect()
    }

    fn selected_index(&self, order: &[NodeId]) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        order.iter().position(|node_id| node_id == selected)
    }

    fn select_next(&mut self) {
        let order = self.node_order();
        if order.is_empty() {
            return;
        }
        let next = match self.selected_index(&order) {
            Some(idx) => (idx + 1) % order.len(),
            None => 0,
        };
        self.selected = Some(order[next].clone());
    }

    fn select_prev(&mut self) {
        let order = self.node_order();
        if order.is_empty() {
            return;
        }
        let prev = match self.selected_index(&order) {
            Some(0) | None => order.len() - 1,
            Some(idx) => idx - 1,
        };
        self.selected = Some(order[prev].clone());
    }

    fn cycle_draft_kind(&mut self) {
        let idx = NodeKind::ALL
            .iter()
            .position(|kind| *kind == self.draft_kind)
            .unwrap_or(0);
        self.draft_kind = NodeKind::ALL[(idx + 1) % NodeKind::ALL.len()];
        self.set_toast(format!("New nodes: {}", self.draft_kind));
    }

    fn start_draft_child(&mut self) {
        if self.selected.is_none() {
            self.set_toast("Select a parent first");
            return;
        }
        self.mode = Mode::DraftChild {
            buffer: String::new(),
        };
    }

    fn start_edit_label(&mut self) {
        let Some(node_id) = self.selected.clone() else {
            self.set_toast("No node selected");
            return;
        };
        let Some(node) = self.map.node(&node_id) else {
            return;
        };
        self.mode = Mode::EditLabel {
            buffer: node.label().to_owned(),
            node_id,
        };
    }

    /// Creates a child under the selection and moves the selection onto it,
    /// so repeated quick-adds chain downward.
    fn add_child(&mut self, kind: NodeKind, label: Option<String>) {
        let Some(parent_id) = self.selected.clone() else {
            self.set_toast("Select a parent first");
            return;
        };
        let node_id = NodeId::fresh();
        let edge_id = crate::model::EdgeId::fresh();
        let applied = self.apply(Op::AddChild {
            node_id: node_id.clone(),
            edge_id,
            parent_id,
            kind,
            label,
        });
        if applied {
            self.selected = Some(node_id);
        }
    }

    fn delete_selected(&mut self) {
        let Some(node_id) = self.selected.clone() else {
            self.set_toast("No node selected");
            return;
        };
        if self.map.root_id() == Some(&node_id) {
            self.set_toast("The central topic cannot be deleted");
            return;
        }
        if self.apply(Op::DeleteSubtree { node_id }) {
            self.selected = self.map.root_id().cloned();
        }
    }

    /// Two-press connect: first press marks the source, second press draws
    /// the edge from the mark to the current selection.
    fn connect_step(&mut self) {
        let Some(selected) = self.selected.clone() else {
            self.set_toast("No node selected");
            return;
        };
        match self.connect_source.take() {
            None => {
                self.connect_source = Some(selected);
                self.set_toast("Connect: select the target, press c again");
            }
            Some(source_id) => {
                self.apply(Op::Connect {
                    edge_id: crate::model::EdgeId::fresh(),
                    source_id,
                    target_id: selected,
                });
            }
        }
    }

    /// One save at a time. A second trigger while a save is pending is
    /// dropped rather than queued.
    fn request_save(&mut self) {
        if !self.has_store {
            self.set_toast("No remote store configured");
            return;
        }
        if self.save_in_flight {
            self.set_toast("Save already in progress");
            return;
        }
        self.save_in_flight = true;
        self.pending_effects.push(Effect::Save {
            map_id: self.map.map_id().clone(),
            request: UpdateMapRequest::from_map(&self.map),
        });
        self.set_toast("Saving…");
    }

    fn request_layout(&mut self) {
        self.queue_layout();
        self.set_toast("Layout requested");
    }

    /// Each request supersedes the previous one; results are matched against
    /// the generation issued here.
    fn queue_layout(&mut self) {
        self.layout_generation += 1;
        self.pending_effects.push(Effect::Layout {
            generation: self.layout_generation,
            graph: snapshot_graph(&self.map),
        });
    }

    /// Structural changes re-trigger layout; renames and payload edits do
    /// not.
    fn apply(&mut self, op: Op) -> bool {
        match ops::apply_ops(&mut self.map, std::slice::from_ref(&op)) {
            Ok(result) => {
                self.dirty = true;
                if result.delta.is_structural() {
                    self.queue_layout();
                }
                true
            }
            Err(err) => {
                self.set_toast(format!("Edit rejected: {err}"));
                false
            }
        }
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(2),
        });
    }

    fn active_toast(&self) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|toast| toast.expires_at > Instant::now())
            .map(|toast| toast.message.as_str())
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut EditorApp) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(layout[0]);

    let order = app.node_order();
    let items = sidebar_items(app, &order);
    let mut list_state = ListState::default();
    list_state.select(app.selected_index(&order));
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", app.map.name())),
        )
        .highlight_style(Style::default().fg(SELECTED_COLOR));
    frame.render_stateful_widget(list, panes[0], &mut list_state);

    let canvas = Paragraph::new(canvas_text(app)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Canvas ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(canvas, panes[1]);

    frame.render_widget(Paragraph::new(footer_line(app)), layout[1]);
}

fn sidebar_items<'a>(app: &EditorApp, order: &[NodeId]) -> Vec<ListItem<'a>> {
    order
        .iter()
        .filter_map(|node_id| app.map.node(node_id).map(|node| (node_id, node)))
        .map(|(node_id, node)| {
            let marker = if node.is_root() { ROOT_MARKER } else { " " };
            let connect_mark = if app.connect_source.as_ref() == Some(node_id) {
                "→"
            } else {
                " "
            };
            ListItem::new(format!(
                "{marker}{connect_mark}{} [{}]",
                truncate_label(node.label()),
                node.kind()
            ))
        })
        .collect()
}

/// Projects node positions onto a character grid: straight dotted edges
/// first, labels on top.
fn canvas_text(app: &EditorApp) -> Text<'static> {
    if app.map.nodes().is_empty() {
        return Text::raw("empty document");
    }

    let min_x = app
        .map
        .nodes()
        .values()
        .map(|node| node.position().x)
        .fold(f64::INFINITY, f64::min);
    let min_y = app
        .map
        .nodes()
        .values()
        .map(|node| node.position().y)
        .fold(f64::INFINITY, f64::min);

    let cell = |x: f64, y: f64| -> (usize, usize) {
        let col = ((x - min_x) / CANVAS_X_SCALE).round().max(0.0) as usize;
        let row = ((y - min_y) / CANVAS_Y_SCALE).round().max(0.0) as usize;
        (col.min(CANVAS_MAX_COLS - 1), row.min(CANVAS_MAX_ROWS - 1))
    };

    let mut cols = 0usize;
    let mut rows = 0usize;
    for node in app.map.nodes().values() {
        let (col, row) = cell(node.position().x, node.position().y);
        cols = cols.max(col + LABEL_MAX_CHARS + 2);
        rows = rows.max(row + 1);
    }
    cols = cols.min(CANVAS_MAX_COLS);
    rows = rows.min(CANVAS_MAX_ROWS);
    let mut grid = vec![vec![' '; cols]; rows];

    for edge in app.map.edges().values() {
        let (Some(source), Some(target)) = (
            app.map.node(edge.source_id()),
            app.map.node(edge.target_id()),
        ) else {
            continue;
        };
        let (c0, r0) = cell(source.position().x, source.position().y);
        let (c1, r1) = cell(target.position().x, target.position().y);
        let steps = c0.abs_diff(c1).max(r0.abs_diff(r1));
        for step in 0..=steps {
            let t = if steps == 0 {
                0.0
            } else {
                step as f64 / steps as f64
            };
            let col = (c0 as f64 + (c1 as f64 - c0 as f64) * t).round() as usize;
            let row = (r0 as f64 + (r1 as f64 - r0 as f64) * t).round() as usize;
            if row < rows && col < cols && grid[row][col] == ' ' {
                grid[row][col] = '·';
            }
        }
    }

    for (node_id, node) in app.map.nodes() {
        let (col, row) = cell(node.position().x, node.position().y);
        if row >= rows {
            continue;
        }
        let selected = app.selected.as_ref() == Some(node_id);
        let rendered = if selected {
            format!("«{}»", truncate_label(node.label()))
        } else {
            format!("[{}]", truncate_label(node.label()))
        };
        for (offset, ch) in rendered.chars().enumerate() {
            let col = col + offset;
            if col < cols {
                grid[row][col] = ch;
            }
        }
    }

    let lines = grid
        .into_iter()
        .map(|row| Line::raw(row.into_iter().collect::<String>()))
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        label.to_owned()
    } else {
        let truncated = label.chars().take(LABEL_MAX_CHARS - 1).collect::<String>();
        format!("{truncated}…")
    }
}

fn footer_line(app: &EditorApp) -> Line<'static> {
    if let Some(toast) = app.active_toast() {
        return Line::styled(toast.to_owned(), Style::default().fg(TOAST_COLOR));
    }

    match &app.mode {
        Mode::EditLabel { buffer, .. } => Line::raw(format!(
            "Label: {buffer}▏  (Enter save, Esc cancel)"
        )),
        Mode::DraftChild { buffer } => Line::raw(format!(
            "New {} child: {buffer}▏  (Enter create, Esc cancel)",
            app.draft_kind
        )),
        Mode::Normal => {
            let dirty = if app.dirty { "* " } else { "" };
            let mut spans = vec![Span::styled(
                format!("{dirty}kind:{} ", app.draft_kind),
                Style::default().fg(Color::Gray),
            )];
            for (key, label) in [
                ("j/k", "select"),
                ("n", "child"),
                ("Tab", "quick-add"),
                ("e", "edit"),
                ("c", "connect"),
                ("d", "delete"),
                ("L", "layout"),
                ("s", "save"),
                ("q", "quit"),
            ] {
                spans.push(Span::styled(key, Style::default().fg(FOOTER_KEY_COLOR)));
                spans.push(Span::raw(format!(" {label}  ")));
            }
            Line::from(spans)
        }
    }
}

fn demo_document() -> MindMap {
    crate::model::fixtures::demo_map()
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
