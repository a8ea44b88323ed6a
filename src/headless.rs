//! Non-interactive front ends over the core engine.

use anyhow::Context;
use invex_core::{dumpsys, filter, Inventory};
use invex_tui::widgets::json_tree::JsonTreeState;
use serde_json::{json, Value};
use std::path::Path;

/// Run `query` over `doc`. The full outcome is `{result, matchCounts,
/// totalMatches}`; with `counts_only` the result document is left out.
pub fn search(query: &str, doc: &Value, counts_only: bool) -> anyhow::Result<Value> {
    let outcome = filter(query, &Inventory::from(doc));
    tracing::debug!(query, total = outcome.total_matches, "headless search");
    if counts_only {
        return Ok(json!({
            "matchCounts": outcome.match_counts,
            "totalMatches": outcome.total_matches,
        }));
    }
    serde_json::to_value(&outcome).context("serializing search outcome")
}

/// Render `doc` as an indented text tree opened to `depth`, with `values`
/// arrays laid out `values_per_row` to a line.
pub fn show(doc: &Value, depth: usize, values_per_row: usize) -> String {
    let mut tree = JsonTreeState::new(values_per_row);
    tree.set_document("", doc, depth);
    let mut out = tree.plain_lines().join("\n");
    out.push('\n');
    out
}

/// Convert a dumpsys report to inventory JSON. Writes to `output` when given,
/// otherwise returns the text for the caller to print.
pub fn import(report: &Path, output: Option<&Path>) -> anyhow::Result<Option<String>> {
    let doc = dumpsys::parse_report_file(report)?;
    let text = serde_json::to_string_pretty(&doc)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{text}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(report = %report.display(), output = %path.display(), "report imported");
            Ok(None)
        }
        None => Ok(Some(text)),
    }
}
