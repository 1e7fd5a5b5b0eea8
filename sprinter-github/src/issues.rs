//! Issue and pull request listings

use crate::client::ListParams;
use crate::GitHubClient;
use sprinter_core::filter::ItemQuery;
use sprinter_core::{Issue, Page, PageCursor, PullRequest, RepoId, TrackerResult};
use tracing::debug;

impl GitHubClient {
    /// Fetch one page of issues
    pub async fn issue_page(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Issue>> {
        debug!(repo = %repo, state = query.state.as_str(), "Listing issues");
        self.get_page(
            &Self::route(repo, "issues"),
            &ListParams::filtered(query),
            cursor,
        )
        .await
    }

    /// Fetch one page of pull requests
    pub async fn pull_request_page(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<PullRequest>> {
        debug!(repo = %repo, state = query.state.as_str(), "Listing pull requests");
        self.get_page(
            &Self::route(repo, "pulls"),
            &ListParams::filtered(query),
            cursor,
        )
        .await
    }
}
