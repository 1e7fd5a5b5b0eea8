//! The batch operations exposed to callers
//!
//! [`Sprinter`] holds the monitored repository set and an [`IssueTracker`],
//! and runs every operation across all repositories at once. Per-repository
//! failures come back as data in [`Batch::errors`]; only configuration
//! problems are returned as `Err`.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{CacheKey, ResponseCache};
use crate::fanout::{for_each_repo, for_each_repo_flattened, for_each_target, Batch, Fetched};
use crate::filter::{IssueFilter, IssueFormat, ItemQuery};
use crate::model::{
    Collaborator, Issue, ItemState, Label, LabelSpec, Milestone, MilestoneSpec, MilestoneUpdate,
    PullRequest, RepoScoped, TrackedItem,
};
use crate::network::{group_network, NetworkView};
use crate::paginate::fetch_all;
use crate::repo::{self, RepoId};
use crate::shape::{
    dedup_collaborators, group_milestones, retain_milestone, sort_by_recency, MilestoneGroups,
};
use crate::tracker::IssueTracker;
use crate::Result;

/// Issues or pull requests, either as a flat list or in network format
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    List(Vec<T>),
    Network(NetworkView<T>),
}

impl<T> Listing<T> {
    /// Every item, regardless of presentation
    pub fn items(&self) -> &[T] {
        match self {
            Listing::List(items) => items,
            Listing::Network(view) => &view.all,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn as_network(&self) -> Option<&NetworkView<T>> {
        match self {
            Listing::Network(view) => Some(view),
            Listing::List(_) => None,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::List(Vec::new())
    }
}

/// A milestone located in one repository
#[derive(Debug, Clone, PartialEq, Eq)]
struct MilestoneTarget {
    repo: RepoId,
    number: u64,
}

impl AsRef<RepoId> for MilestoneTarget {
    fn as_ref(&self) -> &RepoId {
        &self.repo
    }
}

fn tagged<T: RepoScoped>(mut item: T, repo: &RepoId) -> T {
    item.set_repo(&repo.slug());
    item
}

/// Runs issue tracker operations across a set of repositories
pub struct Sprinter {
    tracker: Arc<dyn IssueTracker>,
    repos: Vec<RepoId>,
    cache: ResponseCache,
}

impl Sprinter {
    /// Create a sprinter over `slugs`.
    ///
    /// Fails before any network activity when the slug list is empty or any
    /// slug is malformed. A zero `cache_duration` disables caching.
    pub fn new<S: AsRef<str>>(
        tracker: Arc<dyn IssueTracker>,
        slugs: &[S],
        cache_duration: Duration,
    ) -> Result<Self> {
        let repos = repo::resolve(slugs)?;
        info!(repos = repos.len(), ?cache_duration, "Created sprinter");

        Ok(Self {
            tracker,
            repos,
            cache: ResponseCache::new(cache_duration),
        })
    }

    /// The monitored repositories, in configuration order
    pub fn repos(&self) -> &[RepoId] {
        &self.repos
    }

    /// Change how long future results are cached
    pub fn set_cache_duration(&self, duration: Duration) {
        self.cache.set_duration(duration);
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Issues across all monitored repositories, most recently updated first.
    ///
    /// Errors only when `filter.repo` is not a valid slug.
    pub async fn get_issues(&self, filter: Option<&IssueFilter>) -> Result<Batch<Listing<Issue>>> {
        self.get_items("getIssues", filter).await
    }

    /// Pull requests across all monitored repositories, most recently updated
    /// first.
    pub async fn get_pull_requests(
        &self,
        filter: Option<&IssueFilter>,
    ) -> Result<Batch<Listing<PullRequest>>> {
        self.get_items("getPullRequests", filter).await
    }

    async fn get_items<T: TrackedItem>(
        &self,
        operation: &'static str,
        filter: Option<&IssueFilter>,
    ) -> Result<Batch<Listing<T>>> {
        let key = match filter {
            Some(filter) => CacheKey::new(operation).with_filter(filter),
            None => CacheKey::new(operation),
        };
        let filter = filter.cloned().unwrap_or_default();
        let single = filter.repo.as_deref().map(RepoId::parse).transpose()?;

        Ok(self
            .cache
            .memoize(key, || self.fetch_items(filter, single))
            .await)
    }

    async fn fetch_items<T: TrackedItem>(
        &self,
        filter: IssueFilter,
        single: Option<RepoId>,
    ) -> Batch<Listing<T>> {
        let mut batch = match &single {
            Some(repo) => {
                debug!(repo = %repo, "Querying a single repository");
                Batch::from_repo(repo, self.fetch_repo_items(repo, &filter).await)
            }
            None => {
                let filter = &filter;
                for_each_repo_flattened(&self.repos, move |repo| {
                    self.fetch_repo_items(repo, filter)
                })
                .await
            }
        };

        if let Some(title) = &filter.milestone {
            retain_milestone(&mut batch.items, title);
        }
        sort_by_recency(&mut batch.items);

        batch.map(|items| match filter.format {
            Some(IssueFormat::Network) => Listing::Network(group_network(items)),
            None => Listing::List(items),
        })
    }

    /// All pages of every requested state for one repository. With
    /// `state: all`, open and closed are fetched concurrently and concatenated
    /// open first; a failing half reports its error and the other half's
    /// items are kept.
    async fn fetch_repo_items<T: TrackedItem>(
        &self,
        repo: &RepoId,
        filter: &IssueFilter,
    ) -> Fetched<Vec<T>> {
        let tracker = self.tracker.as_ref();
        let queries: Vec<ItemQuery> = filter
            .state
            .states()
            .iter()
            .map(|&state| filter.query_for(state))
            .collect();

        let results = join_all(queries.iter().map(move |query| {
            fetch_all(repo, move |cursor| T::list_page(tracker, repo, query, cursor))
        }))
        .await;

        let mut items = Vec::new();
        let mut errors = Vec::new();
        let mut any_succeeded = false;
        for result in results {
            match result {
                Ok(mut part) => {
                    any_succeeded = true;
                    items.append(&mut part);
                }
                Err(err) => errors.push(err),
            }
        }

        Fetched {
            value: any_succeeded.then_some(items),
            errors,
        }
    }

    /// Milestones across all repositories, grouped by exact title
    pub async fn get_milestones(&self) -> Batch<MilestoneGroups> {
        self.cache
            .memoize(CacheKey::new("getMilestones"), || async {
                self.fetch_milestones().await.map(group_milestones)
            })
            .await
    }

    async fn fetch_milestones(&self) -> Batch<Vec<Milestone>> {
        let tracker = self.tracker.as_ref();
        for_each_repo_flattened(&self.repos, move |repo| async move {
            Fetched::from(fetch_all(repo, move |cursor| tracker.list_milestones(repo, cursor)).await)
        })
        .await
    }

    /// Create the same milestone in every repository
    pub async fn create_milestones(&self, spec: &MilestoneSpec) -> Batch<Vec<Milestone>> {
        info!(title = %spec.title, repos = self.repos.len(), "Creating milestones");
        let tracker = self.tracker.as_ref();
        for_each_repo(&self.repos, move |repo| async move {
            Fetched::from(
                tracker
                    .create_milestone(repo, spec)
                    .await
                    .map(|created| tagged(created, repo)),
            )
        })
        .await
    }

    /// Apply `update` to the milestone titled `old_title` in every repository
    /// that has one. Repositories without a match are skipped.
    pub async fn update_milestones(
        &self,
        old_title: &str,
        update: &MilestoneUpdate,
    ) -> Batch<Vec<Milestone>> {
        let tracker = self.tracker.as_ref();
        let found = for_each_repo(&self.repos, move |repo| async move {
            match fetch_all(repo, move |cursor| tracker.list_milestones(repo, cursor)).await {
                Ok(milestones) => match milestones.iter().find(|m| m.title == old_title) {
                    Some(m) => Fetched::ok(MilestoneTarget {
                        repo: repo.clone(),
                        number: m.number,
                    }),
                    None => Fetched::skipped(),
                },
                Err(err) => Fetched::failed(err),
            }
        })
        .await;

        info!(title = %old_title, matches = found.items.len(), "Updating milestones");
        let updated = self.update_targets(&found.items, update).await;
        updated.with_prior_errors(found.errors)
    }

    /// Close every milestone titled `title`. An unknown title is not an
    /// error and closes nothing.
    pub async fn close_milestones(&self, title: &str) -> Batch<Vec<Milestone>> {
        let groups = self.get_milestones().await;
        let Some(matches) = groups.items.get(title) else {
            info!(title = %title, "No milestones to close");
            return Batch::new(groups.errors, Vec::new());
        };

        let targets: Vec<MilestoneTarget> = matches
            .iter()
            .filter_map(|m| {
                RepoId::parse(&m.repo).ok().map(|repo| MilestoneTarget {
                    repo,
                    number: m.number,
                })
            })
            .collect();
        let update = MilestoneUpdate {
            title: Some(title.to_string()),
            state: Some(ItemState::Closed),
            ..Default::default()
        };

        info!(title = %title, count = targets.len(), "Closing milestones");
        let closed = self.update_targets(&targets, &update).await;
        closed.with_prior_errors(groups.errors)
    }

    async fn update_targets(
        &self,
        targets: &[MilestoneTarget],
        update: &MilestoneUpdate,
    ) -> Batch<Vec<Milestone>> {
        let tracker = self.tracker.as_ref();
        for_each_target(targets, move |target| async move {
            Fetched::from(
                tracker
                    .update_milestone(&target.repo, target.number, update)
                    .await
                    .map(|updated| tagged(updated, &target.repo)),
            )
        })
        .await
    }

    /// Labels across all repositories, each tagged with its repository.
    /// Same-named labels in different repositories are distinct records.
    pub async fn get_labels(&self) -> Batch<Vec<Label>> {
        self.cache
            .memoize(CacheKey::new("getLabels"), || self.fetch_labels())
            .await
    }

    async fn fetch_labels(&self) -> Batch<Vec<Label>> {
        let tracker = self.tracker.as_ref();
        for_each_repo_flattened(&self.repos, move |repo| async move {
            Fetched::from(fetch_all(repo, move |cursor| tracker.list_labels(repo, cursor)).await)
        })
        .await
    }

    /// Create every label in every repository.
    ///
    /// Each failed creation is reported as its own error; labels that were
    /// created are returned even when others in the same repository failed.
    pub async fn create_labels(&self, specs: &[LabelSpec]) -> Batch<Vec<Label>> {
        info!(labels = specs.len(), repos = self.repos.len(), "Creating labels");
        let tracker = self.tracker.as_ref();
        for_each_repo_flattened(&self.repos, move |repo| async move {
            let results = join_all(specs.iter().map(move |spec| tracker.create_label(repo, spec))).await;

            let mut created = Vec::new();
            let mut errors = Vec::new();
            for result in results {
                match result {
                    Ok(label) => created.push(tagged(label, repo)),
                    Err(err) => errors.push(err),
                }
            }
            Fetched {
                value: Some(created),
                errors,
            }
        })
        .await
    }

    /// Collaborators across all repositories, deduplicated by login
    pub async fn get_collaborators(&self) -> Batch<Vec<Collaborator>> {
        self.cache
            .memoize(CacheKey::new("getCollaborators"), || async {
                self.fetch_collaborators().await.map(dedup_collaborators)
            })
            .await
    }

    async fn fetch_collaborators(&self) -> Batch<Vec<Collaborator>> {
        let tracker = self.tracker.as_ref();
        for_each_repo_flattened(&self.repos, move |repo| async move {
            Fetched::from(
                fetch_all(repo, move |cursor| tracker.list_collaborators(repo, cursor)).await,
            )
        })
        .await
    }
}

impl std::fmt::Debug for Sprinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprinter")
            .field("repos", &self.repos)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
