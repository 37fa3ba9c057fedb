//! Errors raised while loading reading tables.

use std::path::PathBuf;

pub type Result<T, E = LoadError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid JSON table: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
