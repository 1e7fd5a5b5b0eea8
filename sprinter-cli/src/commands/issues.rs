//! Issue and pull request listings

use clap::{Args, ValueEnum};
use sprinter_core::model::TrackedItem;
use sprinter_core::{Issue, IssueFilter, IssueFormat, Listing, PullRequest, Sprinter, StateFilter};

use super::report::{group_by, print_errors};

/// Milestone heading for issues without one
const BACKLOG: &str = "Backlog";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    Open,
    Closed,
    All,
}

impl From<StateArg> for StateFilter {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Open => StateFilter::Open,
            StateArg::Closed => StateFilter::Closed,
            StateArg::All => StateFilter::All,
        }
    }
}

/// List issues across all repositories
#[derive(Args, Debug)]
pub struct IssuesArgs {
    /// Filter by state
    #[arg(short, long, default_value = "open")]
    pub state: StateArg,

    /// Only issues in the milestone with exactly this title
    #[arg(short, long)]
    pub milestone: Option<String>,

    /// Only issues assigned to this login
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Query only this repository (owner/name)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Show super issues with their subtasks
    #[arg(short, long)]
    pub network: bool,
}

impl IssuesArgs {
    fn filter(&self) -> IssueFilter {
        let mut filter = IssueFilter::default().with_state(self.state.into());
        if let Some(milestone) = &self.milestone {
            filter = filter.with_milestone(milestone);
        }
        if let Some(assignee) = &self.assignee {
            filter = filter.with_assignee(assignee);
        }
        if let Some(repo) = &self.repo {
            filter = filter.with_repo(repo);
        }
        if self.network {
            filter = filter.with_format(IssueFormat::Network);
        }
        filter
    }

    pub async fn execute(&self, sprinter: &Sprinter) -> anyhow::Result<()> {
        let batch = sprinter.get_issues(Some(&self.filter())).await?;

        match &batch.items {
            Listing::Network(view) => {
                for entry in &view.supers {
                    println!("{}", issue_line(&entry.issue));
                    for subtask in &entry.subtasks {
                        println!("    {}", issue_line(subtask));
                    }
                }
                if !view.singletons.is_empty() {
                    println!();
                    println!("Other issues:");
                    for issue in &view.singletons {
                        println!("  {}", issue_line(issue));
                    }
                }
            }
            Listing::List(issues) => print_by_milestone(issues),
        }

        if batch.items.is_empty() {
            println!("No issues found.");
        }
        print_errors(&batch.errors);
        Ok(())
    }
}

fn issue_line(issue: &Issue) -> String {
    let assignee = issue
        .assignee
        .as_ref()
        .map(|user| format!(" ({})", user.login))
        .unwrap_or_default();
    format!(
        "[{}] #{} {}{}  {}",
        issue.repo, issue.number, issue.title, assignee, issue.html_url
    )
}

/// Milestone first, then repository; most recent first within each
fn print_by_milestone(issues: &[Issue]) {
    let by_milestone = group_by(issues, |issue| {
        issue.milestone_title().unwrap_or(BACKLOG).to_string()
    });

    for (milestone, issues) in by_milestone {
        println!("{} ({})", milestone, issues.len());
        let by_repo = group_by(&issues, |issue| issue.repo.clone());
        for (repo, issues) in by_repo {
            println!("  {}", repo);
            for issue in issues {
                println!("    #{} {}", issue.number, issue.title);
            }
        }
        println!();
    }
}

/// List pull requests across all repositories
#[derive(Args, Debug)]
pub struct PrsArgs {
    /// Filter by state
    #[arg(short, long, default_value = "open")]
    pub state: StateArg,

    /// Only pull requests assigned to this login
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Query only this repository (owner/name)
    #[arg(short, long)]
    pub repo: Option<String>,
}

impl PrsArgs {
    pub async fn execute(&self, sprinter: &Sprinter) -> anyhow::Result<()> {
        let mut filter = IssueFilter::default().with_state(self.state.into());
        if let Some(assignee) = &self.assignee {
            filter = filter.with_assignee(assignee);
        }
        if let Some(repo) = &self.repo {
            filter = filter.with_repo(repo);
        }

        let batch = sprinter.get_pull_requests(Some(&filter)).await?;
        let prs = batch.items.items();

        if prs.is_empty() {
            println!("No pull requests found.");
        }
        for (repo, prs) in group_by(prs, |pr| pr.repo.clone()) {
            println!("{} ({})", repo, prs.len());
            for pr in prs {
                println!("  {}", pr_line(pr));
            }
        }

        print_errors(&batch.errors);
        Ok(())
    }
}

fn pr_line(pr: &PullRequest) -> String {
    let draft = if pr.draft { " [draft]" } else { "" };
    let branch = pr
        .head
        .as_ref()
        .map(|head| format!(" <{}>", head.ref_field))
        .unwrap_or_default();
    format!("#{} {}{}{}", pr.number, pr.title, draft, branch)
}
