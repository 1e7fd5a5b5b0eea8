//! Milestone commands

use chrono::{DateTime, Utc};
use clap::Args;
use sprinter_core::{Batch, Milestone, MilestoneSpec, MilestoneUpdate, Sprinter};

use super::report::{format_date, parse_due_date, print_errors};

/// List milestones grouped by title
pub async fn list(sprinter: &Sprinter) {
    let batch = sprinter.get_milestones().await;

    if batch.items.is_empty() {
        println!("No milestones found.");
    }
    for (title, milestones) in &batch.items {
        println!("{}", title);
        for milestone in milestones {
            println!(
                "  {} #{} ({}, {} open / {} closed)",
                milestone.repo,
                milestone.number,
                format_date(milestone.due_on),
                milestone.open_issues,
                milestone.closed_issues
            );
        }
    }

    print_errors(&batch.errors);
}

fn print_milestones(verb: &str, batch: &Batch<Vec<Milestone>>) {
    println!("{} {} milestone(s)", verb, batch.items.len());
    for milestone in &batch.items {
        println!(
            "  {} #{} {} ({})",
            milestone.repo,
            milestone.number,
            milestone.title,
            format_date(milestone.due_on)
        );
    }
    print_errors(&batch.errors);
}

/// Create a milestone in every repository
#[derive(Args, Debug)]
pub struct CreateMilestonesArgs {
    /// Milestone title
    pub title: String,

    /// Milestone description
    pub description: String,

    /// Due date (YYYY-MM-DD)
    #[arg(value_parser = parse_due_date)]
    pub due_on: DateTime<Utc>,
}

impl CreateMilestonesArgs {
    pub async fn execute(&self, sprinter: &Sprinter) {
        let spec = MilestoneSpec::new(&self.title)
            .with_description(&self.description)
            .with_due_on(self.due_on);
        print_milestones("Created", &sprinter.create_milestones(&spec).await);
    }
}

/// Rename a milestone, and optionally move its due date, everywhere
#[derive(Args, Debug)]
pub struct UpdateMilestonesArgs {
    /// Current milestone title
    pub title: String,

    /// New milestone title
    pub new_title: String,

    /// New due date (YYYY-MM-DD)
    #[arg(value_parser = parse_due_date)]
    pub due_on: Option<DateTime<Utc>>,
}

impl UpdateMilestonesArgs {
    fn update(&self) -> MilestoneUpdate {
        MilestoneUpdate {
            title: Some(self.new_title.clone()),
            due_on: self.due_on,
            ..Default::default()
        }
    }

    pub async fn execute(&self, sprinter: &Sprinter) {
        let batch = sprinter.update_milestones(&self.title, &self.update()).await;
        print_milestones("Updated", &batch);
    }
}

/// Close a milestone everywhere
#[derive(Args, Debug)]
pub struct CloseMilestonesArgs {
    /// Milestone title
    pub title: String,
}

impl CloseMilestonesArgs {
    pub async fn execute(&self, sprinter: &Sprinter) {
        print_milestones("Closed", &sprinter.close_milestones(&self.title).await);
    }
}
