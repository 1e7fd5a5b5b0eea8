//! Error types for Sprinter

use thiserror::Error;

/// Result type alias for Sprinter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors raised before any network activity.
///
/// Per-repository failures are never reported through this type; they are
/// returned as data alongside results (see [`crate::RepoError`]).
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error: missing credentials, empty repository set,
    /// malformed slug
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for building a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
