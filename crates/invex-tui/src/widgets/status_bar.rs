//! Status bar widget — the 1-line strip at the top of the screen.
//!
//! Shows the source, when it was last loaded, the size of the inventory and a
//! loading marker while a fetch is in flight. Keybinding hints are
//! right-aligned in the same row.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// What the status bar displays. Built by the app shell on every draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub source: String,
    /// Pre-formatted load time, `None` before the first load completes.
    pub loaded_at: Option<String>,
    pub devices: usize,
    pub characteristics: usize,
    pub loading: bool,
    /// Transient message (last command result or error).
    pub message: Option<String>,
}

impl StatusInfo {
    /// Left-hand text, without styling.
    pub fn summary(&self) -> String {
        let mut text = format!(" invex  {}", self.source);
        if let Some(at) = &self.loaded_at {
            text.push_str(&format!("  loaded {at}"));
        }
        text.push_str(&format!(
            "  {} devices, {} characteristics",
            self.devices, self.characteristics
        ));
        if let Some(msg) = &self.message {
            text.push_str(&format!("  | {msg}"));
        }
        text
    }
}

pub struct StatusBar<'a> {
    info: &'a StatusInfo,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(info: &'a StatusInfo, theme: &'a Theme) -> Self {
        Self { info, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.theme.status_bar);

        let mut spans = vec![Span::raw(self.info.summary())];
        if self.info.loading {
            spans.push(Span::styled("  loading…", self.theme.status_loading));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Keybinding hints at the right edge
        let hint = " q:quit  /:search  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            self.theme.status_bar.patch(Style::default().add_modifier(Modifier::DIM)),
        );
    }
}
