//! invex TUI — ratatui application shell.
//!
//! The left pane shows the inventory (or the last search result) as a JSON
//! tree, the right pane the per-device match counts, and the bottom bar takes
//! the search term. Loads run on the caller's tokio runtime and are handed
//! back to the UI thread over a channel.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};

use invex_core::config::Config;
use invex_sources::Source;
use theme::Theme;
use tokio::runtime::Handle;

/// Start the TUI on `source`. Blocks until the user quits.
pub fn run(config: Config, source: Source, runtime: Handle) -> anyhow::Result<()> {
    let theme = Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.ui.theme, "unknown theme; using default");
        Theme::load_default()
    });
    tracing::info!(source = %source, "starting TUI");
    App::new(AppState::new(source, config, theme), runtime).run()
}
