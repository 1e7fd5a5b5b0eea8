//! Milestone listing and writes

use crate::client::ListParams;
use crate::GitHubClient;
use sprinter_core::{
    Milestone, MilestoneSpec, MilestoneUpdate, Page, PageCursor, RepoId, TrackerResult,
};
use tracing::{debug, info};

impl GitHubClient {
    /// Fetch one page of open milestones
    pub async fn milestone_page(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Milestone>> {
        debug!(repo = %repo, "Listing milestones");
        self.get_page(
            &Self::route(repo, "milestones"),
            &ListParams::plain(),
            cursor,
        )
        .await
    }

    pub async fn post_milestone(
        &self,
        repo: &RepoId,
        spec: &MilestoneSpec,
    ) -> TrackerResult<Milestone> {
        let created: Milestone = self.post(&Self::route(repo, "milestones"), spec).await?;
        info!(repo = %repo, number = created.number, title = %created.title, "Created milestone");
        Ok(created)
    }

    pub async fn patch_milestone(
        &self,
        repo: &RepoId,
        number: u64,
        update: &MilestoneUpdate,
    ) -> TrackerResult<Milestone> {
        let route = Self::route(repo, &format!("milestones/{}", number));
        let updated: Milestone = self.patch(&route, update).await?;
        info!(repo = %repo, number, state = updated.state.as_str(), "Updated milestone");
        Ok(updated)
    }
}
