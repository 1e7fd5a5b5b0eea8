//! CLI command implementations

pub mod issues;
pub mod labels;
pub mod milestones;
mod report;

pub use issues::{IssuesArgs, PrsArgs};
pub use labels::CreateLabelsArgs;
pub use milestones::{CloseMilestonesArgs, CreateMilestonesArgs, UpdateMilestonesArgs};
