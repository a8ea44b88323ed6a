//! invex — inventory explorer.
//!
//! The binary opens the TUI by default. The [`headless`] functions back the
//! `search`, `show` and `import` subcommands, which print JSON or plain text
//! to stdout so the same engine can be scripted.

pub mod headless;
