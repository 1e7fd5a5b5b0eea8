//! "Network" presentation of issues: super issues with their subtasks
//!
//! A super issue carries the `super` label and lists its subtasks as a
//! markdown checklist in its body:
//!
//! ```markdown
//! - [ ] fixes #5
//! * [x] https://github.com/org/repo/issues/7
//! ```
//!
//! A checklist line starts with `-` or `*`, a space, and a one-character box
//! such as `[ ]` or `[x]`. The first reference on the line counts: `#N`,
//! meaning issue N in the super issue's own repository, `owner/name#N`, or a
//! URL whose path ends in `/issues/N`. The last two name the repository
//! explicitly.

use serde::Serialize;
use url::Url;

use crate::model::TrackedItem;

/// Label marking an issue as a super issue
pub const SUPER_LABEL: &str = "super";

/// A subtask reference found in a super issue body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskRef {
    /// `owner/name` when the reference named its repository
    pub repo: Option<String>,
    pub number: u64,
}

impl SubtaskRef {
    pub fn local(number: u64) -> Self {
        Self { repo: None, number }
    }

    pub fn external(repo: impl Into<String>, number: u64) -> Self {
        Self {
            repo: Some(repo.into()),
            number,
        }
    }

    /// Whether `item` is the issue this reference points at, for a reference
    /// written in `super_repo`
    fn points_at<T: TrackedItem>(&self, item: &T, super_repo: &str) -> bool {
        self.number == item.number() && self.repo.as_deref().unwrap_or(super_repo) == item.repo()
    }
}

/// A super issue and the issues it claimed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperIssue<T> {
    #[serde(flatten)]
    pub issue: T,
    pub subtasks: Vec<T>,
}

/// Issues split into supers (with subtasks) and everything else
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkView<T> {
    pub supers: Vec<SuperIssue<T>>,
    /// Neither super issues nor anybody's subtask
    pub singletons: Vec<T>,
    /// The unpartitioned input
    pub all: Vec<T>,
}

impl<T> NetworkView<T> {
    /// Number of issues across the whole view
    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Extract subtask references from checklist lines of `body`
pub fn extract_subtask_refs(body: &str) -> Vec<SubtaskRef> {
    body.lines()
        .filter(|line| is_checklist_line(line))
        .filter_map(find_reference)
        .collect()
}

fn is_checklist_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('-' | '*'))
        && chars.next() == Some(' ')
        && chars.next() == Some('[')
        && chars.next().is_some()
        && chars.next() == Some(']')
}

fn find_reference(line: &str) -> Option<SubtaskRef> {
    for (index, c) in line.char_indices() {
        let rest = &line[index..];
        if rest.starts_with("http://") || rest.starts_with("https://") {
            if let Some(reference) = parse_issue_url(rest) {
                return Some(reference);
            }
        }
        if c == '#' {
            if let Some(number) = leading_number(&rest[1..]) {
                return Some(match repo_prefix(&line[..index]) {
                    Some(repo) => SubtaskRef::external(repo, number),
                    None => SubtaskRef::local(number),
                });
            }
        }
    }
    None
}

/// The `owner/name` slug directly in front of a `#`, if any
fn repo_prefix(before: &str) -> Option<&str> {
    let rest = before.trim_end_matches(|c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')
    });
    let token = &before[rest.len()..];
    let (owner, name) = token.split_once('/')?;
    (!owner.is_empty() && !name.is_empty() && !name.contains('/')).then_some(token)
}

fn parse_issue_url(text: &str) -> Option<SubtaskRef> {
    let end = text
        .find(|c: char| c.is_whitespace() || matches!(c, ')' | ']' | '>'))
        .unwrap_or(text.len());
    let url = Url::parse(&text[..end]).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();

    let issues_at = segments
        .iter()
        .enumerate()
        .rev()
        .find(|(i, segment)| {
            **segment == "issues"
                && segments
                    .get(i + 1)
                    .is_some_and(|n| leading_number(n).is_some())
        })
        .map(|(i, _)| i)?;
    let number = leading_number(segments[issues_at + 1])?;

    if issues_at >= 2 {
        let owner = segments[issues_at - 2];
        let name = segments[issues_at - 1];
        Some(SubtaskRef::external(format!("{}/{}", owner, name), number))
    } else {
        Some(SubtaskRef::local(number))
    }
}

fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Partition issues into super issues, their subtasks and singletons.
///
/// Input order is kept in every output list. When more than one super issue
/// references the same issue, the super issue with the lowest number claims
/// it.
pub fn group_network<T: TrackedItem>(items: Vec<T>) -> NetworkView<T> {
    let all = items.clone();
    let (supers, others): (Vec<T>, Vec<T>) =
        items.into_iter().partition(|item| item.has_label(SUPER_LABEL));

    let mut claim_order: Vec<usize> = (0..supers.len()).collect();
    claim_order.sort_by(|&a, &b| {
        (supers[a].number(), supers[a].repo()).cmp(&(supers[b].number(), supers[b].repo()))
    });

    let mut owner: Vec<Option<usize>> = vec![None; others.len()];
    for &s in &claim_order {
        let refs = extract_subtask_refs(supers[s].body());
        if refs.is_empty() {
            continue;
        }
        for (i, item) in others.iter().enumerate() {
            if owner[i].is_none() && refs.iter().any(|r| r.points_at(item, supers[s].repo())) {
                owner[i] = Some(s);
            }
        }
    }

    let mut subtasks: Vec<Vec<T>> = (0..supers.len()).map(|_| Vec::new()).collect();
    let mut singletons = Vec::new();
    for (item, claimed_by) in others.into_iter().zip(owner) {
        match claimed_by {
            Some(s) => subtasks[s].push(item),
            None => singletons.push(item),
        }
    }

    let supers = supers
        .into_iter()
        .zip(subtasks)
        .map(|(issue, subtasks)| SuperIssue { issue, subtasks })
        .collect();

    NetworkView {
        supers,
        singletons,
        all,
    }
}
