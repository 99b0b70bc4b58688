//! Error types for qload-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A required component was not supplied to a builder
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Queue misuse (closed queue, unbalanced mark_done)
    #[error("queue error: {0}")]
    Queue(String),

    /// Worker error
    #[error("worker error: {0}")]
    Worker(String),

    /// The run was interrupted by the user before it drained
    #[error("run interrupted")]
    Interrupted,

    /// The run was aborted by the fail-fast policy after a transport failure
    #[error("run aborted after transport failure against {target}: {reason}")]
    Aborted {
        /// Target the failing request was sent to
        target: String,
        /// Transport error text
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing-component error
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Create a queue error
    pub fn queue(msg: impl Into<String>) -> Self {
        Self::Queue(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Whether this error ended a run early (interrupt or fail-fast abort)
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Aborted { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
