//! Help popup — centred floating overlay listing keybindings and commands.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Leave search view / quit"),
    ("Tab", "Cycle focus: tree → matches → search"),
    ("/", "Focus search bar"),
    ("Enter (search)", "Run search over the inventory"),
    ("Escape", "Return focus from search bar"),
    ("↑ k  /  ↓ j", "Move cursor"),
    ("← h  /  → l", "Collapse / expand tree node"),
    ("Enter (tree)", "Toggle tree node"),
    ("Enter (matches)", "Show device in tree"),
    ("PageUp / PageDown", "Move cursor by a page"),
    ("c  /  e", "Collapse tree / expand all"),
    ("r", "Reload inventory"),
    (":", "Command line"),
    ("?", "Toggle this help popup"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":q  /  :q!", "Leave search view or quit / quit now"),
    (":collapse", "Show top-level keys only"),
    (":expand [N]", "Expand all, or to depth N"),
    (":clear", "Drop the search, show the inventory"),
    (":reload", "Load the inventory again"),
    (":theme <name>", "Switch theme (default, gruvbox)"),
    (":help", "Toggle this help popup"),
];

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (BINDINGS.len() + COMMANDS.len() + 3) as u16;
        let popup = centered_rect(72, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" invex keybindings (? to close) ")
            .border_style(self.theme.border_focused.add_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let row = |(key, desc): &(&'static str, &'static str)| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<22}", key),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(*desc),
            ])
        };

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(row)
            .chain(std::iter::once(Line::raw("")))
            .chain(COMMANDS.iter().map(row))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
