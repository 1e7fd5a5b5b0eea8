//! Scripted tracker and record builders for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::filter::ItemQuery;
use crate::model::{
    Collaborator, Issue, ItemState, Label, LabelSpec, Milestone, MilestoneSpec, MilestoneUpdate,
    PullRequest,
};
use crate::repo::RepoId;
use crate::tracker::{IssueTracker, Page, PageCursor, TrackerError, TrackerResult};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 4, 1, 0, 0, 0).unwrap()
}

pub fn issue(number: u64, repo: &str) -> Issue {
    Issue {
        number,
        title: format!("Issue {}", number),
        body: None,
        state: ItemState::Open,
        labels: Vec::new(),
        milestone: None,
        assignee: None,
        html_url: format!("https://github.com/{}/issues/{}", repo, number),
        created_at: base_time(),
        updated_at: base_time() + Duration::minutes(number as i64),
        pull_request: None,
        repo: repo.to_string(),
    }
}

pub fn pull_request(number: u64, repo: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {}", number),
        body: None,
        state: ItemState::Open,
        draft: false,
        labels: Vec::new(),
        milestone: None,
        assignee: None,
        html_url: format!("https://github.com/{}/pull/{}", repo, number),
        created_at: base_time(),
        updated_at: base_time() + Duration::minutes(number as i64),
        merged_at: None,
        head: None,
        base: None,
        repo: repo.to_string(),
    }
}

pub fn milestone(number: u64, title: &str, repo: &str) -> Milestone {
    Milestone {
        number,
        title: title.to_string(),
        state: ItemState::Open,
        description: None,
        due_on: None,
        open_issues: 0,
        closed_issues: 0,
        html_url: None,
        repo: repo.to_string(),
    }
}

pub fn label(name: &str) -> Label {
    Label {
        name: name.to_string(),
        color: "ededed".to_string(),
        description: None,
        repo: String::new(),
    }
}

pub fn collaborator(login: &str) -> Collaborator {
    Collaborator {
        login: login.to_string(),
        html_url: format!("https://github.com/{}", login),
        repo: String::new(),
    }
}

impl Issue {
    pub(crate) fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        self
    }

    pub(crate) fn in_milestone(mut self, title: &str) -> Self {
        self.milestone = Some(milestone(1, title, &self.repo));
        self
    }

    pub(crate) fn labeled(mut self, name: &str) -> Self {
        self.labels.push(label(name));
        self
    }

    pub(crate) fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

fn paged<T: Clone>(pages: Option<&Vec<Vec<T>>>, cursor: Option<PageCursor>) -> Page<T> {
    let index = cursor
        .and_then(|c| c.as_str().parse::<usize>().ok())
        .unwrap_or(0);
    let Some(pages) = pages else {
        return Page::last(Vec::new());
    };
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = (index + 1 < pages.len()).then(|| PageCursor::new((index + 1).to_string()));
    Page { items, next }
}

/// An [`IssueTracker`] answering from scripted data.
///
/// Records are returned without a `repo` tag, like a real tracker. Failures
/// are keyed by repository slug and operation name. Listing failures can
/// target one state with `list_issues:<state>` or `list_pull_requests:<state>`,
/// and label creation failures a single label with `create_label:<name>`.
#[derive(Default)]
pub struct MockTracker {
    issues: HashMap<(String, ItemState), Vec<Vec<Issue>>>,
    pull_requests: HashMap<(String, ItemState), Vec<Vec<PullRequest>>>,
    milestones: Mutex<HashMap<String, Vec<Milestone>>>,
    labels: HashMap<String, Vec<Vec<Label>>>,
    collaborators: HashMap<String, Vec<Vec<Collaborator>>>,
    failures: HashMap<(String, String), TrackerError>,
    calls: Mutex<Vec<(String, String)>>,
    queries: Mutex<Vec<ItemQuery>>,
}

fn untagged<T: crate::model::RepoScoped>(mut items: Vec<T>) -> Vec<T> {
    for item in &mut items {
        item.set_repo("");
    }
    items
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue_pages(mut self, slug: &str, state: ItemState, pages: Vec<Vec<Issue>>) -> Self {
        let pages = pages.into_iter().map(untagged).collect();
        self.issues.insert((slug.to_string(), state), pages);
        self
    }

    pub fn with_issues(self, slug: &str, state: ItemState, issues: Vec<Issue>) -> Self {
        self.with_issue_pages(slug, state, vec![issues])
    }

    pub fn with_pull_requests(mut self, slug: &str, state: ItemState, prs: Vec<PullRequest>) -> Self {
        self.pull_requests
            .insert((slug.to_string(), state), vec![untagged(prs)]);
        self
    }

    pub fn with_milestones(self, slug: &str, milestones: Vec<Milestone>) -> Self {
        self.milestones
            .lock()
            .unwrap()
            .insert(slug.to_string(), untagged(milestones));
        self
    }

    pub fn with_label_pages(mut self, slug: &str, pages: Vec<Vec<Label>>) -> Self {
        self.labels.insert(slug.to_string(), pages);
        self
    }

    pub fn with_labels(self, slug: &str, labels: Vec<Label>) -> Self {
        self.with_label_pages(slug, vec![labels])
    }

    pub fn with_collaborators(mut self, slug: &str, collaborators: Vec<Collaborator>) -> Self {
        self.collaborators
            .insert(slug.to_string(), vec![collaborators]);
        self
    }

    pub fn failing(mut self, slug: &str, operation: &str, error: TrackerError) -> Self {
        self.failures
            .insert((slug.to_string(), operation.to_string()), error);
        self
    }

    /// Number of calls made for `operation`, across all repositories
    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| op == operation)
            .count()
    }

    /// Number of calls made for `operation` against `slug`
    pub fn calls_for(&self, operation: &str, slug: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, s)| op == operation && s == slug)
            .count()
    }

    /// Queries received by listing calls, in call order
    pub fn queries(&self) -> Vec<ItemQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Milestones currently stored for `slug`
    pub fn milestones_of(&self, slug: &str) -> Vec<Milestone> {
        self.milestones
            .lock()
            .unwrap()
            .get(slug)
            .cloned()
            .unwrap_or_default()
    }

    fn record_listing(&self, operation: &str, repo: &RepoId, query: &ItemQuery) -> TrackerResult<()> {
        self.record(operation, repo)?;
        self.queries.lock().unwrap().push(query.clone());
        let scoped = format!("{}:{}", operation, query.state.as_str());
        match self.failures.get(&(repo.slug(), scoped)) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record(&self, operation: &str, repo: &RepoId) -> TrackerResult<()> {
        let slug = repo.slug();
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), slug.clone()));
        match self.failures.get(&(slug, operation.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn list_issues(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Issue>> {
        self.record_listing("list_issues", repo, query)?;
        Ok(paged(self.issues.get(&(repo.slug(), query.state)), cursor))
    }

    async fn list_pull_requests(
        &self,
        repo: &RepoId,
        query: &ItemQuery,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<PullRequest>> {
        self.record_listing("list_pull_requests", repo, query)?;
        Ok(paged(
            self.pull_requests.get(&(repo.slug(), query.state)),
            cursor,
        ))
    }

    async fn list_milestones(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Milestone>> {
        self.record("list_milestones", repo)?;
        let milestones = self.milestones_of(&repo.slug());
        Ok(paged(Some(&vec![milestones]), cursor))
    }

    async fn list_labels(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Label>> {
        self.record("list_labels", repo)?;
        Ok(paged(self.labels.get(&repo.slug()), cursor))
    }

    async fn list_collaborators(
        &self,
        repo: &RepoId,
        cursor: Option<PageCursor>,
    ) -> TrackerResult<Page<Collaborator>> {
        self.record("list_collaborators", repo)?;
        Ok(paged(self.collaborators.get(&repo.slug()), cursor))
    }

    async fn create_milestone(
        &self,
        repo: &RepoId,
        spec: &MilestoneSpec,
    ) -> TrackerResult<Milestone> {
        self.record("create_milestone", repo)?;
        let mut all = self.milestones.lock().unwrap();
        let existing = all.entry(repo.slug()).or_default();
        let mut created = milestone(existing.len() as u64 + 1, &spec.title, "");
        created.description = spec.description.clone();
        created.due_on = spec.due_on;
        existing.push(created.clone());
        Ok(created)
    }

    async fn update_milestone(
        &self,
        repo: &RepoId,
        number: u64,
        update: &MilestoneUpdate,
    ) -> TrackerResult<Milestone> {
        self.record("update_milestone", repo)?;
        let mut all = self.milestones.lock().unwrap();
        let target = all
            .get_mut(&repo.slug())
            .and_then(|ms| ms.iter_mut().find(|m| m.number == number))
            .ok_or_else(|| TrackerError::status(404, "Not Found"))?;
        if let Some(title) = &update.title {
            target.title = title.clone();
        }
        if let Some(description) = &update.description {
            target.description = Some(description.clone());
        }
        if let Some(due_on) = update.due_on {
            target.due_on = Some(due_on);
        }
        if let Some(state) = update.state {
            target.state = state;
        }
        Ok(target.clone())
    }

    async fn create_label(&self, repo: &RepoId, spec: &LabelSpec) -> TrackerResult<Label> {
        self.record("create_label", repo)?;
        let specific = format!("create_label:{}", spec.name);
        if let Some(err) = self.failures.get(&(repo.slug(), specific)) {
            return Err(err.clone());
        }
        Ok(Label {
            name: spec.name.clone(),
            color: spec.color.clone(),
            description: spec.description.clone(),
            repo: String::new(),
        })
    }
}
