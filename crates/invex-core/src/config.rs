//! Configuration types for invex.
//!
//! [`Config::load`] reads `~/.config/invex/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::error::InvexError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[source]
default    = "http://127.0.0.1:5500/output.json"
timeout_ms = 5000
watch      = true

[ui]
tree_pane_width_pct = 70
collapsed_depth     = 1
values_per_row      = 8
timestamp_format    = "%H:%M:%S"
theme               = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/invex/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[source]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Where to load the inventory from when `--source` is not given: an
    /// `http(s)://` URL, a JSON file, a dumpsys `.txt` report, or `-`.
    #[serde(default = "default_source")]
    pub default: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Reload automatically when a file source changes on disk.
    #[serde(default = "default_watch")]
    pub watch: bool,
}

fn default_source() -> String { "http://127.0.0.1:5500/output.json".to_string() }
fn default_timeout_ms() -> u64 { 5000 }
fn default_watch() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            default: default_source(),
            timeout_ms: default_timeout_ms(),
            watch: default_watch(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tree_pane_width_pct")]
    pub tree_pane_width_pct: u16,
    /// Depth used by the collapse action.
    #[serde(default = "default_collapsed_depth")]
    pub collapsed_depth: usize,
    /// Elements per row when a `values` array is rendered.
    #[serde(default = "default_values_per_row")]
    pub values_per_row: usize,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_tree_pane_width_pct() -> u16 { 70 }
fn default_collapsed_depth() -> usize { 1 }
fn default_values_per_row() -> usize { 8 }
fn default_timestamp_format() -> String { "%H:%M:%S".to_string() }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tree_pane_width_pct: default_tree_pane_width_pct(),
            collapsed_depth: default_collapsed_depth(),
            values_per_row: default_values_per_row(),
            timestamp_format: default_timestamp_format(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/invex/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self, InvexError> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| InvexError::io(parent, e))?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())
                .map_err(|e| InvexError::io(&path, e))?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit config file layered on top of the built-in defaults.
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, InvexError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("invex")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.source.default, "http://127.0.0.1:5500/output.json");
        assert_eq!(cfg.source.timeout_ms, 5000);
        assert!(cfg.source.watch);
        assert_eq!(cfg.ui.collapsed_depth, 1);
        assert_eq!(cfg.ui.values_per_row, 8);
        assert_eq!(cfg.ui.theme, "default");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/invex/config.toml")).unwrap();
        assert_eq!(cfg.ui.tree_pane_width_pct, 70);
    }
}
