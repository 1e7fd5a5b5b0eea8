//! Labels and collaborators

use crate::client::ListParams;
use crate::GitHubClient;
use sprinter_core::{Collaborator, Label, LabelSpec, Page, PageCursor, RepoId, TrackerResult};
use tracing::{debug, info};

impl GitHubClient {
    /// Fetch one page of labels
    pub async fn label_page(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Label>> {
        debug!(repo = %repo, "Listing labels");
        self.get_page(&Self::route(repo, "labels"), &ListParams::plain(), cursor)
            .await
    }

    pub async fn post_label(&self, repo: &RepoId, spec: &LabelSpec) -> TrackerResult<Label> {
        let created: Label = self.post(&Self::route(repo, "labels"), spec).await?;
        info!(repo = %repo, name = %created.name, "Created label");
        Ok(created)
    }

    /// Fetch one page of collaborators. Requires push access to the
    /// repository.
    pub async fn collaborator_page(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Collaborator>> {
        debug!(repo = %repo, "Listing collaborators");
        self.get_page(
            &Self::route(repo, "collaborators"),
            &ListParams::plain(),
            cursor,
        )
        .await
    }
}
