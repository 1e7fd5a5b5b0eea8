//! Sprinter GitHub - GitHub integration for Sprinter
//!
//! This crate implements the core's `IssueTracker` on top of the GitHub REST
//! API: paged listings of issues, pull requests, milestones, labels and
//! collaborators, plus milestone and label writes.

mod client;
mod error;
mod issues;
mod labels;
mod milestones;
mod tracker;

pub use client::GitHubClient;
pub use error::{Error, Result};
