//! Match panel — per-device match counts of the last search, right pane.
//!
//! Rows are ordered by count (highest first), ties by device id. Devices with
//! zero matches stay listed, dimmed, so the panel always accounts for every
//! device in the inventory.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k`, `↓` / `j` | Move the cursor |
//! | `PageUp` / `PageDown` | Move by a page |
//! | `Enter` | Reveal the device in the tree (handled by the app shell) |

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use invex_core::{DeviceId, FilterOutcome};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MatchPanelState {
    /// The query the counts belong to; `None` before the first search.
    pub query: Option<String>,
    pub rows: Vec<(DeviceId, usize)>,
    pub total: usize,
    pub cursor: usize,
}

impl MatchPanelState {
    /// Show the counts of `outcome`, produced by searching for `query`.
    pub fn set_outcome(&mut self, query: &str, outcome: &FilterOutcome) {
        let mut rows: Vec<(DeviceId, usize)> = outcome
            .match_counts
            .iter()
            .map(|(id, n)| (id.clone(), *n))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        self.query = Some(query.to_string());
        self.rows = rows;
        self.total = outcome.total_matches;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Device id under the cursor.
    pub fn selected(&self) -> Option<&str> {
        self.rows.get(self.cursor).map(|(id, _)| id.as_str())
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let max = self.rows.len().saturating_sub(1);
        match event {
            AppEvent::TreeNav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            AppEvent::TreeNav(Direction::Down) => {
                self.cursor = (self.cursor + 1).min(max);
            }
            AppEvent::ScrollUp => {
                self.cursor = self.cursor.saturating_sub(PAGE_STEP);
            }
            AppEvent::ScrollDown => {
                self.cursor = (self.cursor + PAGE_STEP).min(max);
            }
            _ => return,
        }
        tracing::debug!(cursor = self.cursor, "matches: cursor moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct MatchPanel<'a> {
    state: &'a MatchPanelState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> MatchPanel<'a> {
    pub fn new(state: &'a MatchPanelState, focused: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

impl Widget for MatchPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match &self.state.query {
            Some(q) => format!(" Matches: {} for \"{q}\" ", self.state.total),
            None => " Matches ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(self.theme.border(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.state.query.is_none() {
            Paragraph::new(Line::from(Span::styled(
                "press / and Enter to search",
                Style::default().add_modifier(Modifier::DIM),
            )))
            .render(inner, buf);
            return;
        }

        let width = self
            .state
            .rows
            .iter()
            .map(|(id, _)| id.chars().count())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = self
            .state
            .rows
            .iter()
            .map(|(id, n)| {
                let style = if *n > 0 {
                    self.theme.match_hit
                } else {
                    self.theme.match_miss
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{id:<width$}  ")),
                    Span::styled(n.to_string(), style),
                ]))
            })
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn outcome() -> FilterOutcome {
        let inv = invex_core::Inventory::from(json!({
            "devices": {
                "a": {"characteristics": {"x": "auto"}},
                "b": {"characteristics": {"modes": {"values": ["AUTO", "CONTINUOUS_AUTO"]}}},
                "c": {"characteristics": {"y": "off"}}
            }
        }));
        invex_core::filter("auto", &inv)
    }

    #[test]
    fn rows_sorted_by_count_then_id() {
        let mut state = MatchPanelState::default();
        state.set_outcome("auto", &outcome());
        assert_eq!(
            state.rows,
            vec![("b".to_string(), 2), ("a".to_string(), 1), ("c".to_string(), 0)]
        );
        assert_eq!(state.total, 3);
        assert_eq!(state.selected(), Some("b"));
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = MatchPanelState::default();
        state.set_outcome("auto", &outcome());
        state.handle(&AppEvent::ScrollDown);
        assert_eq!(state.selected(), Some("c"));
        state.handle(&AppEvent::TreeNav(Direction::Up));
        assert_eq!(state.selected(), Some("a"));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut state = MatchPanelState::default();
        state.set_outcome("auto", &outcome());
        state.clear();
        assert!(state.query.is_none());
        assert!(state.selected().is_none());
    }
}
