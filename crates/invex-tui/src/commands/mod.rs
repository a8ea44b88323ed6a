// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use crate::{app::AppState, theme::Theme, theme::THEME_NAMES, widgets::json_tree::FULL_DEPTH};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Leave the search view; quit when the inventory is already shown
    Quit,
    // Quit regardless of what is shown
    Exit,
    // Display help
    Help,
    // Change theme
    Theme(String),
    // Show the tree to the configured collapsed depth
    Collapse,
    // Show the tree fully, or to the given depth
    Expand(Option<usize>),
    // Drop the search and show the whole inventory again
    Clear,
    // Fetch the inventory again
    Reload,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "q!" | "quit!" => Ok(Command::Exit),
            "help" => Ok(Command::Help),
            "collapse" => Ok(Command::Collapse),
            "clear" => Ok(Command::Clear),
            "reload" => Ok(Command::Reload),
            "expand" if rest.is_empty() => Ok(Command::Expand(None)),
            "expand" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Command::Expand(Some(n))),
                _ => Err("usage: expand [depth ≥ 1]".to_string()),
            },
            "theme" => {
                if rest.is_empty() {
                    Err(format!("usage: theme <{}>", THEME_NAMES.join("|")))
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
///
/// Returns an error message to show in the command bar when the command
/// cannot be carried out.
pub fn execute_command(s: &mut AppState, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::Quit => s.quit_or_leave_search(),
        Command::Exit => {
            s.quit = true;
        }
        Command::Help => {
            s.show_help = !s.show_help;
        }
        Command::Theme(name) => {
            s.theme = Theme::by_name(&name).ok_or_else(|| format!("unknown theme: {name}"))?;
            s.message = Some(format!("theme: {name}"));
        }
        Command::Collapse => {
            s.tree.show_to_depth(s.config.ui.collapsed_depth);
        }
        Command::Expand(depth) => {
            s.tree.show_to_depth(depth.unwrap_or(FULL_DEPTH));
        }
        Command::Clear => s.clear_search(),
        Command::Reload => s.request_reload()?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
