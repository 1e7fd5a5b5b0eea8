//! Running one operation across many repositories at once
//!
//! Every repository gets its own future; all of them are polled concurrently
//! and the batch completes once each has settled. A failing repository never
//! stops its siblings: its errors are attributed to it and returned next to
//! whatever the other repositories produced.

use std::future::Future;

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::repo::RepoId;
use crate::repo_error::RepoError;
use crate::tracker::{TrackerError, TrackerResult};

/// What one repository produced: a value, errors, or some of both
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: Option<T>,
    pub errors: Vec<TrackerError>,
}

impl<T> Fetched<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
        }
    }

    pub fn failed(error: TrackerError) -> Self {
        Self {
            value: None,
            errors: vec![error],
        }
    }

    /// Nothing to report, e.g. a repository skipped by the operation
    pub fn skipped() -> Self {
        Self {
            value: None,
            errors: Vec::new(),
        }
    }
}

impl<T> From<TrackerResult<T>> for Fetched<T> {
    fn from(result: TrackerResult<T>) -> Self {
        match result {
            Ok(value) => Fetched::ok(value),
            Err(error) => Fetched::failed(error),
        }
    }
}

/// Outcome of a batch operation.
///
/// `errors` and `items` are independent: a batch can carry both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Batch<T> {
    pub errors: Vec<RepoError>,
    pub items: T,
}

impl<T> Batch<T> {
    pub fn new(errors: Vec<RepoError>, items: T) -> Self {
        Self { errors, items }
    }

    /// Wrap the outcome of a single repository
    pub fn from_repo(repo: &RepoId, fetched: Fetched<T>) -> Self
    where
        T: Default,
    {
        let errors = attribute_all(repo, fetched.errors);
        Self {
            errors,
            items: fetched.value.unwrap_or_default(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Batch<U> {
        Batch {
            errors: self.errors,
            items: f(self.items),
        }
    }

    /// Append the errors of an earlier phase in front of this batch's
    pub fn with_prior_errors(mut self, mut prior: Vec<RepoError>) -> Self {
        prior.append(&mut self.errors);
        self.errors = prior;
        self
    }
}

fn attribute_all(repo: &RepoId, errors: Vec<TrackerError>) -> Vec<RepoError> {
    errors
        .into_iter()
        .map(|err| {
            warn!(repo = %repo, code = ?err.code, error = %err.message, "Repository operation failed");
            RepoError::attribute(repo, err)
        })
        .collect()
}

/// Run `run` once per target concurrently.
///
/// Targets are anything that names a repository. Values are returned in
/// target order with failed or skipped targets left out.
pub async fn for_each_target<'a, K, T, F, Fut>(targets: &'a [K], run: F) -> Batch<Vec<T>>
where
    K: AsRef<RepoId>,
    F: Fn(&'a K) -> Fut,
    Fut: Future<Output = Fetched<T>>,
{
    let outcomes = join_all(targets.iter().map(&run)).await;

    let mut errors = Vec::new();
    let mut items = Vec::with_capacity(outcomes.len());
    for (target, outcome) in targets.iter().zip(outcomes) {
        errors.extend(attribute_all(target.as_ref(), outcome.errors));
        if let Some(value) = outcome.value {
            items.push(value);
        }
    }

    info!(
        repos = targets.len(),
        succeeded = items.len(),
        errors = errors.len(),
        "Batch complete"
    );

    Batch { errors, items }
}

/// Run `run` once per repository concurrently
pub async fn for_each_repo<'a, T, F, Fut>(repos: &'a [RepoId], run: F) -> Batch<Vec<T>>
where
    F: Fn(&'a RepoId) -> Fut,
    Fut: Future<Output = Fetched<T>>,
{
    for_each_target(repos, run).await
}

/// Like [`for_each_repo`] for operations that yield a collection per
/// repository, merged into one list
pub async fn for_each_repo_flattened<'a, T, F, Fut>(repos: &'a [RepoId], run: F) -> Batch<Vec<T>>
where
    F: Fn(&'a RepoId) -> Fut,
    Fut: Future<Output = Fetched<Vec<T>>>,
{
    for_each_repo(repos, run)
        .await
        .map(|nested| nested.into_iter().flatten().collect())
}
