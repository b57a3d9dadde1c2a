//! Errors for the file and configuration surfaces.
//!
//! Scheduling itself never fails: short rosters produce empty rounds and the
//! gender pre-flight check hands back a message instead of an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid schedule JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("player id `{0}` appears more than once in the roster")]
    DuplicatePlayer(String),

    #[error("round {0} is not part of the schedule")]
    UnknownRound(u32),
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SessionError::Io {
            path: path.into(),
            source,
        }
    }
}
