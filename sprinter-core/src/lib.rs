//! Sprinter Core - multi-repository issue tracking
//!
//! This crate runs the same issue tracker query or write across a set of
//! repositories concurrently, merges the results and reports per-repository
//! failures next to the data instead of aborting.

pub mod cache;
pub mod config;
pub mod error;
pub mod fanout;
pub mod filter;
pub mod model;
pub mod network;
pub mod paginate;
pub mod repo;
pub mod repo_error;
pub mod secrets;
pub mod shape;
pub mod sprinter;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use fanout::Batch;
pub use filter::{IssueFilter, IssueFormat, StateFilter};
pub use model::{
    Collaborator, Issue, ItemState, Label, LabelSpec, Milestone, MilestoneSpec, MilestoneUpdate,
    PullRequest,
};
pub use network::NetworkView;
pub use repo::RepoId;
pub use repo_error::RepoError;
pub use secrets::{Credentials, Secrets};
pub use shape::MilestoneGroups;
pub use sprinter::{Listing, Sprinter};
pub use tracker::{IssueTracker, Page, PageCursor, TrackerError, TrackerResult};
