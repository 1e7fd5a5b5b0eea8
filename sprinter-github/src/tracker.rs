//! [`IssueTracker`] backed by the GitHub REST API

use async_trait::async_trait;
use sprinter_core::filter::ItemQuery;
use sprinter_core::{
    Collaborator, Issue, IssueTracker, Label, LabelSpec, Milestone, MilestoneSpec,
    MilestoneUpdate, Page, PageCursor, PullRequest, RepoId, TrackerResult,
};

use crate::GitHubClient;

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn list_issues(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Issue>> {
        self.issue_page(repo, query, cursor).await
    }

    async fn list_pull_requests(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<PullRequest>> {
        self.pull_request_page(repo, query, cursor).await
    }

    async fn list_milestones(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Milestone>> {
        self.milestone_page(repo, cursor).await
    }

    async fn list_labels(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Label>> {
        self.label_page(repo, cursor).await
    }

    async fn list_collaborators(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Collaborator>> {
        self.collaborator_page(repo, cursor).await
    }

    async fn create_milestone(
        &self,
        repo: &RepoId,
        spec: &MilestoneSpec,
    ) -> TrackerResult<Milestone> {
        self.post_milestone(repo, spec).await
    }

    async fn update_milestone(
        &self,
        repo: &RepoId,
        number: u64,
        update: &MilestoneUpdate,
    ) -> TrackerResult<Milestone> {
        self.patch_milestone(repo, number, update).await
    }

    async fn create_label(&self, repo: &RepoId, spec: &LabelSpec) -> TrackerResult<Label> {
        self.post_label(repo, spec).await
    }
}
