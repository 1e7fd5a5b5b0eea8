//! Error types for GitHub operations

use sprinter_core::TrackerError;
use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the client. Request failures are reported
/// as [`TrackerError`]s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Malformed API base URL
    #[error("Invalid GitHub API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Convert an octocrab failure into a tracker error.
///
/// GitHub's own error responses keep their status code and validation
/// details; transport failures have no code.
pub(crate) fn tracker_error(err: octocrab::Error) -> TrackerError {
    match err {
        octocrab::Error::GitHub { source, .. } => github_error(
            source.status_code.as_u16(),
            source.message,
            source.errors.unwrap_or_default(),
        ),
        other => TrackerError::new(None, other.to_string()),
    }
}

fn github_error(code: u16, message: String, errors: Vec<serde_json::Value>) -> TrackerError {
    TrackerError::status(code, message).with_errors(errors)
}
