//! Error types for invex-core.

use std::path::PathBuf;

/// Errors raised by the fallible parts of the core crate.
///
/// The filter engine itself never fails; these cover configuration, file
/// access for the dumpsys importer, and the chunking precondition.
#[derive(Debug, thiserror::Error)]
pub enum InvexError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InvexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InvexError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InvexError>;
