use clap::{Parser, Subcommand};
use invex::headless;
use invex_core::config::Config;
use invex_sources::Source;
use invex_tui::widgets::json_tree::FULL_DEPTH;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "invex", about = "Inventory explorer — browse and search device inventories")]
struct Cli {
    /// Inventory to load: http(s) URL, JSON file, dumpsys .txt report, or `-`
    /// for stdin. Defaults to `source.default` from the config file.
    #[arg(long, global = true)]
    source: Option<String>,

    /// Config file to use instead of ~/.config/invex/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/invex-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the search outcome as JSON.
    Search {
        query: String,
        /// Print only matchCounts and totalMatches.
        #[arg(long)]
        counts_only: bool,
    },
    /// Print the inventory as an indented tree.
    Show {
        /// Open the tree this many levels deep (default: fully).
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Convert a dumpsys media.camera report to inventory JSON.
    Import {
        report: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.command.is_some())?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config load failed; using defaults");
            Config::defaults()
        }),
    };
    let source: Source = cli
        .source
        .as_deref()
        .unwrap_or(&config.source.default)
        .parse()?;
    let timeout = Duration::from_millis(config.source.timeout_ms);

    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        None => {
            let result = invex_tui::run(config, source, runtime.handle().clone());
            // A pending stdin read must not hold up exit.
            runtime.shutdown_background();
            result
        }
        Some(Cmd::Search { query, counts_only }) => {
            let doc = runtime.block_on(source.load_or_empty(timeout));
            let out = headless::search(&query, &doc, counts_only)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Some(Cmd::Show { depth }) => {
            let doc = runtime.block_on(source.load_or_empty(timeout));
            print!(
                "{}",
                headless::show(&doc, depth.unwrap_or(FULL_DEPTH), config.ui.values_per_row)
            );
            Ok(())
        }
        Some(Cmd::Import { report, output }) => {
            if let Some(text) = headless::import(&report, output.as_deref())? {
                println!("{text}");
            }
            Ok(())
        }
    }
}

/// `--debug` sends everything to a file so it does not tear the TUI. The
/// headless subcommands log warnings to stderr, which keeps stdout clean.
fn init_logging(debug: bool, headless: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/invex-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("invex debug log started — tail -f /tmp/invex-debug.log");
    } else if headless {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}
