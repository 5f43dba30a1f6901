//! Error types for diskwatch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the endpoint, config and reporting layers.
#[derive(Debug, Error)]
pub enum DiskwatchError {
    /// Something already sits at the socket path and could not be removed.
    #[error("failed to remove stale socket {}: {source}", path.display())]
    StaleRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("receive failed: {0}")]
    Receive(#[source] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiskwatchError>;
