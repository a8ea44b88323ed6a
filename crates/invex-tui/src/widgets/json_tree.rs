//! JSON tree widget — collapsible view of the loaded inventory or the last
//! search result in the left pane.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor up and down the visible list.
//! - `PageUp`/`PageDown` move by a page.
//! - `→`/`l` expands the focused node; `←`/`h` collapses it.
//! - `Enter` toggles the focused node.
//!
//! # Depth
//!
//! [`JsonTreeState::show_to_depth`] opens every node shallower than the given
//! depth and closes the rest. Depth 1 shows the top-level keys only; the
//! default for a fresh document is full depth.
//!
//! Scalar `values` arrays (the alternatives of a value-list characteristic)
//! are laid out as rows of a fixed width instead of one line per element.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use invex_core::chunk::chunked;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use serde_json::Value;
use std::num::NonZeroUsize;

const PAGE_STEP: usize = 10;

/// Depth that opens every node.
pub const FULL_DEPTH: usize = usize::MAX;

// ---------------------------------------------------------------------------
// Tree node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Object with this many keys.
    Object(usize),
    /// Array with this many elements.
    Array(usize),
    Scalar(Value),
    /// A run of `values` elements starting at index `start`.
    Row { start: usize, items: Vec<Value> },
}

impl NodeKind {
    /// One-line text form: `{n}` / `[n]` for containers, the JSON text for
    /// scalars, the space-separated elements for rows.
    pub fn summary(&self) -> String {
        match self {
            NodeKind::Object(n) => format!("{{{n}}}"),
            NodeKind::Array(n) => format!("[{n}]"),
            NodeKind::Scalar(value) => value.to_string(),
            NodeKind::Row { start, items } => {
                let items: Vec<String> = items.iter().map(element_text).collect();
                format!("{start:>4}  {}", items.join(" "))
            }
        }
    }
}

/// Row element text: strings unquoted, everything else as JSON.
fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// JSON-pointer path from the document root; `""` for the root.
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub expanded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Build the node for `value` and all of its descendants.
    pub fn from_value(
        id: String,
        label: impl Into<String>,
        value: &Value,
        per_row: NonZeroUsize,
    ) -> Self {
        let label = label.into();
        let (kind, children) = match value {
            Value::Object(map) => {
                let children = map
                    .iter()
                    .map(|(key, v)| {
                        TreeNode::from_value(child_id(&id, key), key.as_str(), v, per_row)
                    })
                    .collect();
                (NodeKind::Object(map.len()), children)
            }
            Value::Array(items) if label == "values" && items.iter().all(is_scalar) => {
                let rows = chunked(items, per_row)
                    .enumerate()
                    .map(|(i, row)| {
                        let start = i * per_row.get();
                        TreeNode {
                            id: child_id(&id, &format!("{start}..")),
                            label: String::new(),
                            kind: NodeKind::Row {
                                start,
                                items: row.to_vec(),
                            },
                            expanded: false,
                            children: Vec::new(),
                        }
                    })
                    .collect();
                (NodeKind::Array(items.len()), rows)
            }
            Value::Array(items) => {
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        TreeNode::from_value(child_id(&id, &i.to_string()), format!("[{i}]"), v, per_row)
                    })
                    .collect();
                (NodeKind::Array(items.len()), children)
            }
            scalar => (NodeKind::Scalar(scalar.clone()), Vec::new()),
        };

        Self {
            id,
            label,
            kind,
            expanded: true,
            children,
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Append `key` to a JSON pointer, escaping `~` and `/`.
fn child_id(parent: &str, key: &str) -> String {
    format!("{parent}/{}", key.replace('~', "~0").replace('/', "~1"))
}

/// JSON pointer for a device entry.
pub fn device_pointer(device_id: &str) -> String {
    child_id("/devices", device_id)
}

// ---------------------------------------------------------------------------
// Tree state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct JsonTreeState {
    pub root: Option<TreeNode>,
    /// Index into the currently-visible (flattened) list.
    pub cursor: usize,
    /// Pane title, e.g. `Inventory` or `Result: red`.
    pub title: String,
    /// Lowercased query; labels and strings containing it are highlighted.
    pub highlight: Option<String>,
    per_row: NonZeroUsize,
}

impl Default for JsonTreeState {
    fn default() -> Self {
        Self::new(8)
    }
}

impl JsonTreeState {
    /// `values_per_row` of 0 is treated as 1.
    pub fn new(values_per_row: usize) -> Self {
        Self {
            root: None,
            cursor: 0,
            title: "Inventory".to_string(),
            highlight: None,
            per_row: NonZeroUsize::new(values_per_row).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Replace the displayed document and open it to `depth`.
    pub fn set_document(&mut self, title: impl Into<String>, doc: &Value, depth: usize) {
        let root = TreeNode::from_value(String::new(), "", doc, self.per_row);
        self.title = title.into();
        self.root = Some(root);
        self.cursor = 0;
        self.show_to_depth(depth);
        tracing::debug!(title = %self.title, nodes = self.visible().len(), "tree: document set");
    }

    /// Open nodes shallower than `depth`, close the rest.
    pub fn show_to_depth(&mut self, depth: usize) {
        if let Some(root) = &mut self.root {
            expand_to_depth(root, 0, depth);
        }
        self.clamp_cursor();
        tracing::debug!(depth, "tree: show to depth");
    }

    /// Flatten the tree into `(depth, &node)` pairs, respecting expanded state.
    pub fn visible(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            flatten(root, 0, &mut out);
        }
        out
    }

    /// Open every ancestor of `id` and move the cursor onto it. Returns
    /// `false` when no such node exists.
    pub fn reveal(&mut self, id: &str) -> bool {
        let found = self.root.as_mut().is_some_and(|root| open_path(root, id));
        if found {
            if let Some(pos) = self.visible().iter().position(|(_, n)| n.id == id) {
                self.cursor = pos;
            }
            tracing::debug!(node = %id, cursor = self.cursor, "tree: reveal");
        }
        found
    }

    /// The visible tree as indented plain text, one line per node.
    pub fn plain_lines(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .map(|(depth, node)| {
                let indent = "  ".repeat(depth);
                let summary = node.kind.summary();
                if node.label.is_empty() {
                    format!("{indent}{summary}")
                } else {
                    format!("{indent}{}: {summary}", node.label)
                }
            })
            .collect()
    }

    fn cursor_id(&self) -> Option<String> {
        self.visible()
            .into_iter()
            .nth(self.cursor)
            .map(|(_, n)| n.id.clone())
    }

    /// Handle an [`AppEvent`], mutating state as appropriate.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::TreeNav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::debug!(cursor = self.cursor, "tree: cursor up");
            }
            AppEvent::TreeNav(Direction::Down) => {
                let max = self.visible().len().saturating_sub(1);
                if self.cursor < max {
                    self.cursor += 1;
                }
                tracing::debug!(cursor = self.cursor, "tree: cursor down");
            }
            AppEvent::ScrollUp => {
                self.cursor = self.cursor.saturating_sub(PAGE_STEP);
            }
            AppEvent::ScrollDown => {
                self.cursor += PAGE_STEP;
                self.clamp_cursor();
            }
            AppEvent::TreeNav(Direction::Right) => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: expand");
                    self.update(&id, |n| n.expanded = true);
                }
            }
            AppEvent::TreeNav(Direction::Left) => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: collapse");
                    self.update(&id, |n| n.expanded = false);
                    self.clamp_cursor();
                }
            }
            AppEvent::Enter => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: toggle expand");
                    self.update(&id, |n| n.expanded = !n.expanded);
                    self.clamp_cursor();
                }
            }
            _ => {}
        }
    }

    fn update(&mut self, id: &str, f: impl FnOnce(&mut TreeNode)) {
        if let Some(node) = self.root.as_mut().and_then(|root| find_mut(root, id)) {
            f(node);
        }
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Recursive tree helpers
// ---------------------------------------------------------------------------

fn flatten<'a>(node: &'a TreeNode, depth: usize, out: &mut Vec<(usize, &'a TreeNode)>) {
    out.push((depth, node));
    if node.expanded {
        for child in &node.children {
            flatten(child, depth + 1, out);
        }
    }
}

fn expand_to_depth(node: &mut TreeNode, depth: usize, limit: usize) {
    node.expanded = depth < limit;
    for child in &mut node.children {
        expand_to_depth(child, depth + 1, limit);
    }
}

fn find_mut<'a>(node: &'a mut TreeNode, id: &str) -> Option<&'a mut TreeNode> {
    if node.id == id {
        return Some(node);
    }
    node.children.iter_mut().find_map(|child| find_mut(child, id))
}

/// Expand every node on the way to `id`. Returns `true` if found.
fn open_path(node: &mut TreeNode, id: &str) -> bool {
    if node.id == id {
        return true;
    }
    let prefix = format!("{}/", node.id);
    if !id.starts_with(&prefix) {
        return false;
    }
    if node.children.iter_mut().any(|child| open_path(child, id)) {
        node.expanded = true;
        return true;
    }
    false
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct JsonTree<'a> {
    state: &'a JsonTreeState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> JsonTree<'a> {
    pub fn new(state: &'a JsonTreeState, focused: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }

    fn line(&self, depth: usize, node: &'a TreeNode) -> Line<'a> {
        let theme = self.theme;
        let marker = if node.children.is_empty() {
            "  "
        } else if node.expanded {
            "▼ "
        } else {
            "▶ "
        };
        let mut spans = vec![Span::raw("  ".repeat(depth)), Span::raw(marker)];

        if !node.label.is_empty() {
            spans.push(Span::styled(
                node.label.as_str(),
                self.highlighted(&node.label, theme.json_key),
            ));
            spans.push(Span::styled(": ", theme.json_punctuation));
        }

        match &node.kind {
            NodeKind::Object(_) | NodeKind::Array(_) => {
                spans.push(Span::styled(node.kind.summary(), theme.json_punctuation));
            }
            NodeKind::Scalar(value) => {
                let text = value.to_string();
                let style = self.highlighted(&text, theme.value_style(value));
                spans.push(Span::styled(text, style));
            }
            NodeKind::Row { start, items } => {
                spans.push(Span::styled(format!("{start:>4}  "), theme.json_punctuation));
                for item in items {
                    let text = element_text(item);
                    let style = self.highlighted(&text, theme.value_style(item));
                    spans.push(Span::styled(text, style));
                    spans.push(Span::raw(" "));
                }
            }
        }
        Line::from(spans)
    }

    fn highlighted(&self, text: &str, base: Style) -> Style {
        match &self.state.highlight {
            Some(needle) if text.to_lowercase().contains(needle.as_str()) => {
                self.theme.search_highlight
            }
            _ => base,
        }
    }
}

impl Widget for JsonTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" {} ", self.state.title))
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .state
            .visible()
            .into_iter()
            .map(|(depth, node)| ListItem::new(self.line(depth, node)))
            .collect();

        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
