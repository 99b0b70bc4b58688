//! Error types for qload-transport

use thiserror::Error;

/// Transport construction error
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
