//! Label and collaborator commands

use clap::Args;
use sprinter_core::{LabelSpec, Sprinter};

use super::report::{group_by, print_errors};

/// List labels grouped by repository
pub async fn list(sprinter: &Sprinter) {
    let batch = sprinter.get_labels().await;

    for (repo, labels) in group_by(&batch.items, |label| label.repo.clone()) {
        println!("{} ({})", repo, labels.len());
        for label in labels {
            println!("  {} #{}", label.name, label.color);
        }
    }

    print_errors(&batch.errors);
}

/// List collaborators of every repository, each login once, under the first
/// repository it was seen in
pub async fn collaborators(sprinter: &Sprinter) {
    let batch = sprinter.get_collaborators().await;

    println!("Collaborators ({}):", batch.items.len());
    for (repo, collaborators) in group_by(&batch.items, |c| c.repo.clone()) {
        println!("  {}", repo);
        for collaborator in collaborators {
            println!("    {}  {}", collaborator.login, collaborator.html_url);
        }
    }

    print_errors(&batch.errors);
}

fn parse_label(value: &str) -> Result<LabelSpec, String> {
    match value.rsplit_once(':') {
        Some((name, color)) if !name.is_empty() && !color.is_empty() => {
            Ok(LabelSpec::new(name, color))
        }
        _ => Err(format!("Expected name:color, got {:?}", value)),
    }
}

/// Create labels in every repository
#[derive(Args, Debug)]
pub struct CreateLabelsArgs {
    /// Labels as name:color, e.g. bug:fc2929
    #[arg(required = true, value_parser = parse_label)]
    pub labels: Vec<LabelSpec>,
}

impl CreateLabelsArgs {
    pub async fn execute(&self, sprinter: &Sprinter) {
        let batch = sprinter.create_labels(&self.labels).await;

        println!("Created {} label(s)", batch.items.len());
        for (repo, labels) in group_by(&batch.items, |label| label.repo.clone()) {
            let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
            println!("  {}: {}", repo, names.join(", "));
        }

        print_errors(&batch.errors);
    }
}
