//! Filter options for issue and pull request retrieval

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ItemState;

/// Which states to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    /// Both open and closed, fetched separately and concatenated
    All,
}

impl StateFilter {
    /// The concrete states the tracker must be queried with, in output order
    pub fn states(self) -> &'static [ItemState] {
        match self {
            StateFilter::Open => &[ItemState::Open],
            StateFilter::Closed => &[ItemState::Closed],
            StateFilter::All => &[ItemState::Open, ItemState::Closed],
        }
    }
}

/// Alternative presentation of an issue listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueFormat {
    /// Super issues with their subtasks, plus remaining singletons
    Network,
}

/// Filters accepted by issue and pull request listings.
///
/// `milestone`, `format` and `repo` are applied locally. `assignee`, `state`
/// and any key in `extra` are forwarded to the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilter {
    #[serde(default)]
    pub state: StateFilter,

    /// Exact milestone title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,

    /// Assignee login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Query only this `owner/name` instead of every monitored repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<IssueFormat>,

    /// Unrecognized keys, passed through to the tracker untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl IssueFilter {
    pub fn with_state(mut self, state: StateFilter) -> Self {
        self.state = state;
        self
    }

    pub fn with_milestone(mut self, title: impl Into<String>) -> Self {
        self.milestone = Some(title.into());
        self
    }

    pub fn with_assignee(mut self, login: impl Into<String>) -> Self {
        self.assignee = Some(login.into());
        self
    }

    pub fn with_repo(mut self, slug: impl Into<String>) -> Self {
        self.repo = Some(slug.into());
        self
    }

    pub fn with_format(mut self, format: IssueFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The query sent to the tracker for one concrete state
    pub fn query_for(&self, state: ItemState) -> ItemQuery {
        ItemQuery {
            state,
            assignee: self.assignee.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Parameters forwarded to the tracker for one listing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemQuery {
    pub state: ItemState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_open() {
        let filter = IssueFilter::default();
        assert_eq!(filter.state, StateFilter::Open);
        assert_eq!(filter.state.states(), &[ItemState::Open]);
    }

    #[test]
    fn test_all_expands_open_then_closed() {
        assert_eq!(
            StateFilter::All.states(),
            &[ItemState::Open, ItemState::Closed]
        );
    }

    #[test]
    fn test_query_drops_local_filters() {
        let filter = IssueFilter::default()
            .with_milestone("Sprint 1")
            .with_format(IssueFormat::Network)
            .with_repo("org/repo")
            .with_assignee("rhyolight")
            .with_param("labels", "bug");

        let query = filter.query_for(ItemState::Closed);
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(json["state"], "closed");
        assert_eq!(json["assignee"], "rhyolight");
        assert_eq!(json["labels"], "bug");
        assert!(json.get("milestone").is_none());
        assert!(json.get("format").is_none());
        assert!(json.get("repo").is_none());
    }

    #[test]
    fn test_unknown_keys_land_in_extra() {
        let filter: IssueFilter =
            serde_json::from_str(r#"{"state":"all","sort":"created","milestone":"M1"}"#).unwrap();
        assert_eq!(filter.state, StateFilter::All);
        assert_eq!(filter.milestone.as_deref(), Some("M1"));
        assert_eq!(filter.extra.get("sort").map(String::as_str), Some("created"));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let a = IssueFilter::default().with_param("b", "2").with_param("a", "1");
        let b = IssueFilter::default().with_param("a", "1").with_param("b", "2");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
