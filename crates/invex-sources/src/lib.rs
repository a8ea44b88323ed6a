//! invex-sources — where inventory documents come from.
//!
//! A [`Source`] names one place to load an inventory from: an HTTP endpoint,
//! a JSON file, a dumpsys report, or stdin. [`Source::fetch`] returns the
//! document or a [`SourceError`]; [`Source::load_or_empty`] absorbs the error
//! into an empty document, which is what interactive callers want.

pub mod error;
pub mod http;
pub mod watch;

pub use error::SourceError;
pub use watch::{watch, SourceWatcher};

use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `http://` or `https://` endpoint serving inventory JSON.
    Http(String),
    /// Inventory JSON on disk.
    File(PathBuf),
    /// A `dumpsys media.camera` report (`*.txt`), converted on load.
    Dumpsys(PathBuf),
    /// `-`
    Stdin,
}

impl FromStr for Source {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s == "-" {
            Source::Stdin
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Source::Http(s.to_string())
        } else {
            let path = PathBuf::from(s);
            let is_report = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
            if is_report {
                Source::Dumpsys(path)
            } else {
                Source::File(path)
            }
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => f.write_str(url),
            Source::File(path) | Source::Dumpsys(path) => write!(f, "{}", path.display()),
            Source::Stdin => f.write_str("-"),
        }
    }
}

impl Source {
    /// Path on disk for file-backed sources, used for watching.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Source::File(path) | Source::Dumpsys(path) => Some(path),
            Source::Http(_) | Source::Stdin => None,
        }
    }

    /// Load the inventory document.
    pub async fn fetch(&self, timeout: Duration) -> Result<Value, SourceError> {
        let doc = match self {
            Source::Http(url) => http::get_json(url, timeout).await?,
            Source::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| SourceError::io(path, e))?;
                serde_json::from_slice(&bytes)?
            }
            Source::Dumpsys(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| SourceError::io(path, e))?;
                invex_core::dumpsys::parse_report(&text)
            }
            Source::Stdin => {
                let mut bytes = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(|e| SourceError::io("<stdin>", e))?;
                serde_json::from_slice(&bytes)?
            }
        };
        tracing::info!(source = %self, "inventory loaded");
        Ok(doc)
    }

    /// Like [`fetch`](Self::fetch), but any failure yields `{}` and a warning.
    pub async fn load_or_empty(&self, timeout: Duration) -> Value {
        match self.fetch(timeout).await {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(source = %self, error = %e, "load failed; using empty inventory");
                Value::Object(Map::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(s: &str) -> Source {
        s.parse().unwrap()
    }

    #[test]
    fn classifies_source_strings() {
        assert_eq!(parse("-"), Source::Stdin);
        assert_eq!(
            parse("http://127.0.0.1:5500/output.json"),
            Source::Http("http://127.0.0.1:5500/output.json".into())
        );
        assert_eq!(parse("https://inv.example/x"), Source::Http("https://inv.example/x".into()));
        assert_eq!(parse("dump.TXT"), Source::Dumpsys("dump.TXT".into()));
        assert_eq!(parse("inventory.json"), Source::File("inventory.json".into()));
    }

    #[test]
    fn display_round_trips_the_input() {
        for s in ["-", "http://h/x.json", "/tmp/a.json", "/tmp/b.txt"] {
            assert_eq!(parse(s).to_string(), s);
        }
    }

    #[test]
    fn only_files_have_local_paths() {
        assert!(parse("a.json").local_path().is_some());
        assert!(parse("a.txt").local_path().is_some());
        assert!(parse("-").local_path().is_none());
        assert!(parse("http://h/x").local_path().is_none());
    }

    #[tokio::test]
    async fn fetches_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inv.json");
        std::fs::write(&path, r#"{"noOfDevices": 1, "devices": {}}"#).unwrap();

        let doc = Source::File(path).fetch(Duration::from_secs(1)).await.unwrap();
        assert_eq!(doc, json!({"noOfDevices": 1, "devices": {}}));
    }

    #[tokio::test]
    async fn converts_dumpsys_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        std::fs::write(
            &path,
            "== Camera HAL device device@3.5/legacy/0 (v3.5) static information: ==\n  Facing: Back\n",
        )
        .unwrap();

        let doc = Source::Dumpsys(path).fetch(Duration::from_secs(1)).await.unwrap();
        assert_eq!(doc["devices"]["0"]["characteristics"]["Facing"], json!("Back"));
    }

    #[tokio::test]
    async fn malformed_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = Source::File(path).fetch(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[tokio::test]
    async fn load_or_empty_absorbs_failures() {
        let doc = Source::File("/nonexistent/invex.json".into())
            .load_or_empty(Duration::from_secs(1))
            .await;
        assert_eq!(doc, json!({}));
    }
}
