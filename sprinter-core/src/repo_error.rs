//! Repository-attributed errors
//!
//! Raw tracker failures are normalized into a closed set of readable errors,
//! each naming the repository it happened in. They are built once, when the
//! repository is known, and never modified afterwards.

use serde::Serialize;
use thiserror::Error;

use crate::repo::RepoId;
use crate::tracker::TrackerError;

/// A failure in one repository of a batch operation
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepoError {
    /// 403
    #[error("You must have push access to run this operation on \"{repo}\".")]
    Unauthorized { repo: String },

    /// 404
    #[error("Unknown repository: \"{repo}\"")]
    UnknownRepository { repo: String },

    /// 410
    #[error("\"{repo}\" has no GitHub Issues associated with it.")]
    TrackerDisabled { repo: String },

    /// 422, with the tracker's field errors
    #[error("Validation error on \"{repo}\": {}", render_field_errors(.errors))]
    ValidationFailed {
        repo: String,
        errors: Vec<serde_json::Value>,
    },

    /// Anything else; the tracker's message is passed through verbatim
    #[error("{message}")]
    Unrecognized {
        repo: String,
        code: Option<u16>,
        message: String,
    },
}

impl RepoError {
    /// Attribute a tracker failure to `repo`
    pub fn attribute(repo: &RepoId, err: TrackerError) -> Self {
        let repo = repo.slug();
        match err.code {
            Some(403) => RepoError::Unauthorized { repo },
            Some(404) => RepoError::UnknownRepository { repo },
            Some(410) => RepoError::TrackerDisabled { repo },
            Some(422) => RepoError::ValidationFailed {
                repo,
                errors: err.errors,
            },
            code => RepoError::Unrecognized {
                repo,
                code,
                message: err.message,
            },
        }
    }

    /// Slug of the repository the error happened in
    pub fn repo(&self) -> &str {
        match self {
            RepoError::Unauthorized { repo }
            | RepoError::UnknownRepository { repo }
            | RepoError::TrackerDisabled { repo }
            | RepoError::ValidationFailed { repo, .. }
            | RepoError::Unrecognized { repo, .. } => repo,
        }
    }

    /// HTTP status code, when there was one
    pub fn code(&self) -> Option<u16> {
        match self {
            RepoError::Unauthorized { .. } => Some(403),
            RepoError::UnknownRepository { .. } => Some(404),
            RepoError::TrackerDisabled { .. } => Some(410),
            RepoError::ValidationFailed { .. } => Some(422),
            RepoError::Unrecognized { code, .. } => *code,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn render_field_errors(errors: &[serde_json::Value]) -> String {
    serde_json::Value::Array(errors.to_vec()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo() -> RepoId {
        RepoId::new("numenta", "nupic")
    }

    #[test]
    fn test_unauthorized() {
        let err = RepoError::attribute(&repo(), TrackerError::status(403, "Forbidden"));
        assert_eq!(err.code(), Some(403));
        assert_eq!(err.repo(), "numenta/nupic");
        assert_eq!(
            err.message(),
            "You must have push access to run this operation on \"numenta/nupic\"."
        );
    }

    #[test]
    fn test_unknown_repository() {
        let err = RepoError::attribute(&repo(), TrackerError::status(404, "Not Found"));
        assert!(matches!(err, RepoError::UnknownRepository { .. }));
        assert_eq!(err.message(), "Unknown repository: \"numenta/nupic\"");
    }

    #[test]
    fn test_tracker_disabled() {
        let err = RepoError::attribute(
            &repo(),
            TrackerError::status(410, "Issues are disabled for this repo"),
        );
        assert_eq!(
            err.message(),
            "\"numenta/nupic\" has no GitHub Issues associated with it."
        );
    }

    #[test]
    fn test_validation_failed_renders_field_errors() {
        let tracker_err = TrackerError::status(422, "Validation Failed").with_errors(vec![json!({
            "resource": "Label",
            "code": "already_exists",
            "field": "name"
        })]);

        let err = RepoError::attribute(&repo(), tracker_err);
        assert_eq!(err.code(), Some(422));
        assert!(err
            .message()
            .starts_with("Validation error on \"numenta/nupic\": [{"));
        assert!(err.message().contains("already_exists"));
    }

    #[test]
    fn test_unrecognized_passes_message_through() {
        let err = RepoError::attribute(&repo(), TrackerError::status(502, "Bad Gateway"));
        assert_eq!(err.code(), Some(502));
        assert_eq!(err.message(), "Bad Gateway");

        let err = RepoError::attribute(&repo(), TrackerError::new(None, "connection reset"));
        assert_eq!(err.code(), None);
        assert_eq!(err.repo(), "numenta/nupic");
        assert_eq!(err.message(), "connection reset");
    }
}
