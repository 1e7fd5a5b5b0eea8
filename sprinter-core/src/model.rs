//! Records returned by the tracker and payloads sent to it
//!
//! Every record carries the `repo` slug it came from. The tracker leaves it
//! empty; the paginator fills it in.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::filter::ItemQuery;
use crate::repo::RepoId;
use crate::tracker::{IssueTracker, Page, PageCursor, TrackerResult};

/// Open/closed state of an issue, pull request or milestone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    #[default]
    Open,
    Closed,
}

impl ItemState {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }
}

/// A record tagged with its originating repository
pub trait RepoScoped {
    fn repo(&self) -> &str;
    fn set_repo(&mut self, slug: &str);
}

/// GitHub user reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Repository label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,
}

/// Repository milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub closed_issues: u64,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repo: String,
}

/// Issue as returned by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Present when the issue is actually a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub repo: String,
}

/// Branch reference on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub ref_field: String,
}

/// Pull request as returned by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: ItemState,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub head: Option<BranchRef>,
    #[serde(default)]
    pub base: Option<BranchRef>,
    #[serde(default)]
    pub repo: String,
}

/// Repository collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub login: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub repo: String,
}

macro_rules! impl_repo_scoped {
    ($($ty:ty),+) => {
        $(impl RepoScoped for $ty {
            fn repo(&self) -> &str {
                &self.repo
            }

            fn set_repo(&mut self, slug: &str) {
                self.repo = slug.to_string();
            }
        })+
    };
}

impl_repo_scoped!(Label, Milestone, Issue, PullRequest, Collaborator);

/// Behaviour shared by issues and pull requests, which are listed, filtered,
/// sorted and grouped the same way.
pub trait TrackedItem: RepoScoped + Clone + Send + Sync + 'static {
    /// Fetch one page of this kind of item
    fn list_page<'a>(
        tracker: &'a dyn IssueTracker,
        repo: &'a RepoId,
        query: &'a ItemQuery,
        cursor: Option<PageCursor>,
    ) -> BoxFuture<'a, TrackerResult<Page<Self>>>;

    fn number(&self) -> u64;
    fn updated_at(&self) -> DateTime<Utc>;
    fn milestone(&self) -> Option<&Milestone>;
    fn labels(&self) -> &[Label];
    fn body(&self) -> &str;

    fn milestone_title(&self) -> Option<&str> {
        self.milestone().map(|m| m.title.as_str())
    }

    fn has_label(&self, name: &str) -> bool {
        self.labels().iter().any(|l| l.name == name)
    }
}

impl TrackedItem for Issue {
    fn list_page<'a>(
        tracker: &'a dyn IssueTracker,
        repo: &'a RepoId,
        query: &'a ItemQuery,
        cursor: Option<PageCursor>,
    ) -> BoxFuture<'a, TrackerResult<Page<Self>>> {
        tracker.list_issues(repo, query, cursor)
    }

    fn number(&self) -> u64 {
        self.number
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn milestone(&self) -> Option<&Milestone> {
        self.milestone.as_ref()
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

impl TrackedItem for PullRequest {
    fn list_page<'a>(
        tracker: &'a dyn IssueTracker,
        repo: &'a RepoId,
        query: &'a ItemQuery,
        cursor: Option<PageCursor>,
    ) -> BoxFuture<'a, TrackerResult<Page<Self>>> {
        tracker.list_pull_requests(repo, query, cursor)
    }

    fn number(&self) -> u64 {
        self.number
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn milestone(&self) -> Option<&Milestone> {
        self.milestone.as_ref()
    }

    fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Payload for creating the same milestone everywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSpec {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<Utc>>,
}

impl MilestoneSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_on: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_on(mut self, due_on: DateTime<Utc>) -> Self {
        self.due_on = Some(due_on);
        self
    }
}

/// Fields to change on an existing milestone; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ItemState>,
}

/// Payload for creating a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub name: String,
    /// Hex color without the leading `#`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelSpec {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into().trim_start_matches('#').to_string(),
            description: None,
        }
    }
}
