//! Ratatui widgets for the invex TUI.

pub mod command_bar;
pub mod help;
pub mod json_tree;
pub mod match_panel;
pub mod query_bar;
pub mod status_bar;
