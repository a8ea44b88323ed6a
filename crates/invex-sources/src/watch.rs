//! File watching for local sources.
//!
//! Uses `notify`'s recommended backend (inotify on Linux). Every create or
//! modify event on the watched path sends one reload signal; the receiver is
//! expected to coalesce bursts.

use crate::error::SourceError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc::UnboundedSender;

/// Handle that keeps a watch alive.
pub type SourceWatcher = RecommendedWatcher;

/// Watch `path` and send `()` on `tx` whenever it changes.
///
/// The returned watcher must be kept alive; dropping it stops the watch.
pub fn watch(path: &Path, tx: UnboundedSender<()>) -> Result<SourceWatcher, SourceError> {
    let shown = path.display().to_string();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) => {
            tracing::debug!(path = %shown, kind = ?event.kind, "source changed");
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(path = %shown, error = %e, "file watch error"),
    })?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %path.display(), "watching source");
    Ok(watcher)
}
