//! Error types for the keyer process

use std::path::PathBuf;

use keyer_core::{ConfigError, HalError};
use thiserror::Error;

/// Fatal conditions of the keyer process.
///
/// None of these are retried: the process releases the key and exits
/// with a non-zero status.
#[derive(Error, Debug)]
pub enum HostError {
    /// Out-of-range or inconsistent keyer settings
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Paddle script could not be opened or read
    #[error("cannot read paddle script {}: {source}", path.display())]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed paddle script line
    #[error("paddle script line {line}: {message}")]
    Script { line: usize, message: String },

    /// Key output rejected a write
    #[error("key output failed: {0}")]
    Output(#[from] HalError),

    /// Interrupt signal could not be installed
    #[error("cannot listen for interrupts: {0}")]
    Signal(#[source] std::io::Error),

    /// Keyer worker task panicked or was cancelled
    #[error("keyer worker died: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Convenience result alias for host operations
pub type Result<T> = std::result::Result<T, HostError>;

impl HostError {
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        HostError::Script {
            line,
            message: message.into(),
        }
    }
}
