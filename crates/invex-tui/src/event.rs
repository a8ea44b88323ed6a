//! Key handling: crossterm events become [`AppEvent`]s before they reach
//! [`AppState`](crate::app::AppState).
//!
//! | Key | Browsing | Typing (query / command bar) |
//! |-----|----------|------------------------------|
//! | `q` | `Quit` | `Char('q')` |
//! | `Ctrl+c` | `Quit` | `Quit` |
//! | `c` / `e` / `r` | `Collapse` / `Expand` / `Reload` | `Char` |
//! | `hjkl`, arrows | `TreeNav` | arrows only |
//! | `/` | `QueryFocus` | `Char('/')` |
//! | `PageUp` / `PageDown`, `Ctrl+u` / `Ctrl+d` | `ScrollUp` / `ScrollDown` | none |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Leave the search view, or exit when none is shown.
    Quit,
    FocusNext,
    QueryFocus,
    ScrollUp,
    ScrollDown,
    /// Tree to `ui.collapsed_depth`.
    Collapse,
    /// Tree fully open.
    Expand,
    Reload,
    /// Cursor movement in the tree and match panel; text cursor in the bars.
    TreeNav(Direction),
    Char(char),
    Backspace,
    /// Run the search, the command, or reveal the selected device.
    Enter,
    Resize(u16, u16),
    Escape,
}

/// Mapping while browsing the tree or match panel.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => shortcut(&key).or_else(|| common(&key)),
        _ => None,
    }
}

/// Mapping while a text bar has focus: letters are typed, not shortcuts.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => common(&key),
        _ => None,
    }
}

fn shortcut(key: &KeyEvent) -> Option<AppEvent> {
    let event = match (key.code, key.modifiers) {
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => AppEvent::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
            AppEvent::ScrollDown
        }
        (code, KeyModifiers::NONE) => match code {
            KeyCode::Char('q') => AppEvent::Quit,
            KeyCode::Char('/') => AppEvent::QueryFocus,
            KeyCode::Char('c') => AppEvent::Collapse,
            KeyCode::Char('e') => AppEvent::Expand,
            KeyCode::Char('r') => AppEvent::Reload,
            KeyCode::Char('k') => AppEvent::TreeNav(Direction::Up),
            KeyCode::Char('j') => AppEvent::TreeNav(Direction::Down),
            KeyCode::Char('h') => AppEvent::TreeNav(Direction::Left),
            KeyCode::Char('l') => AppEvent::TreeNav(Direction::Right),
            _ => return None,
        },
        _ => return None,
    };
    Some(event)
}

/// Bindings shared by both modes.
fn common(key: &KeyEvent) -> Option<AppEvent> {
    let plain = key.modifiers == KeyModifiers::NONE;
    let event = match key.code {
        KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => AppEvent::Quit,
        KeyCode::Char(c) if plain || key.modifiers == KeyModifiers::SHIFT => AppEvent::Char(c),
        KeyCode::Up => AppEvent::TreeNav(Direction::Up),
        KeyCode::Down => AppEvent::TreeNav(Direction::Down),
        KeyCode::Left => AppEvent::TreeNav(Direction::Left),
        KeyCode::Right => AppEvent::TreeNav(Direction::Right),
        KeyCode::Tab if plain => AppEvent::FocusNext,
        KeyCode::Backspace if plain => AppEvent::Backspace,
        KeyCode::Enter if plain => AppEvent::Enter,
        KeyCode::Esc => AppEvent::Escape,
        _ => return None,
    };
    Some(event)
}
