//! Sorting, filtering and grouping of merged results

use std::collections::{BTreeMap, HashSet};

use crate::model::{Collaborator, Milestone, TrackedItem};

/// Milestones from every repository, keyed by exact title
pub type MilestoneGroups = BTreeMap<String, Vec<Milestone>>;

/// Most recently updated first. Ties keep their merge order.
pub fn sort_by_recency<T: TrackedItem>(items: &mut [T]) {
    items.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
}

/// Keep only items whose milestone title is exactly `title`.
/// Items without a milestone are dropped.
pub fn retain_milestone<T: TrackedItem>(items: &mut Vec<T>, title: &str) {
    items.retain(|item| item.milestone_title() == Some(title));
}

/// Group milestones by exact, case-sensitive title.
///
/// Within a group milestones keep the order they were merged in.
pub fn group_milestones(milestones: Vec<Milestone>) -> MilestoneGroups {
    let mut groups = MilestoneGroups::new();
    for milestone in milestones {
        groups
            .entry(milestone.title.clone())
            .or_default()
            .push(milestone);
    }
    groups
}

/// Drop collaborators whose login was already seen; the first one wins
pub fn dedup_collaborators(collaborators: Vec<Collaborator>) -> Vec<Collaborator> {
    let mut seen = HashSet::new();
    collaborators
        .into_iter()
        .filter(|c| seen.insert(c.login.clone()))
        .collect()
}
