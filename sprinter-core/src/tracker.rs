//! Interface to the issue tracker backing every operation
//!
//! The core never talks HTTP itself. It drives an [`IssueTracker`], which
//! fetches one page of one resource for one repository per call, and performs
//! single create/update requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::ItemQuery;
use crate::model::{
    Collaborator, Issue, Label, LabelSpec, Milestone, MilestoneSpec, MilestoneUpdate, PullRequest,
};
use crate::repo::RepoId;

/// Result type for tracker calls
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

/// Opaque position of the next page, as handed out by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Set when more pages exist
    pub next: Option<PageCursor>,
}

impl<T> Page<T> {
    /// A page with nothing after it
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Raw failure reported by the tracker, before repository attribution
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TrackerError {
    /// HTTP status, when the failure came from the remote API
    pub code: Option<u16>,
    pub message: String,
    /// Structured validation errors (422 responses)
    pub errors: Vec<serde_json::Value>,
}

impl TrackerError {
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// An API failure with an HTTP status code
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(Some(code), message)
    }

    pub fn with_errors(mut self, errors: Vec<serde_json::Value>) -> Self {
        self.errors = errors;
        self
    }
}

/// Issue tracker client.
///
/// Listing calls return one page; passing the returned `next` cursor back in
/// fetches the following page.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn list_issues(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Issue>>;

    async fn list_pull_requests(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<PullRequest>>;

    async fn list_milestones(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Milestone>>;

    async fn list_labels(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Label>>;

    async fn list_collaborators(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Collaborator>>;

    async fn create_milestone(
        &self,
        repo: &RepoId,
        spec: &MilestoneSpec,
    ) -> TrackerResult<Milestone>;

    async fn update_milestone(
        &self,
        repo: &RepoId,
        number: u64,
        update: &MilestoneUpdate,
    ) -> TrackerResult<Milestone>;

    async fn create_label(&self, repo: &RepoId, spec: &LabelSpec) -> TrackerResult<Label>;
}
