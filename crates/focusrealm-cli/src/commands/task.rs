//! Task management commands for CLI.

use clap::Subcommand;
use focusrealm_core::progression::{Difficulty, Priority};
use focusrealm_core::NewTask;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Difficulty: easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: String,
        /// Estimated minutes (default: 25)
        #[arg(long, default_value = "25")]
        estimate: u32,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Incomplete tasks in recommended order
    Rank,
    /// Complete a task and collect its XP
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Claim the review bonus for a completed task
    Review {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            difficulty,
            estimate,
        } => {
            let mut new = NewTask::new(title)
                .priority(priority.parse::<Priority>()?)
                .difficulty(difficulty.parse::<Difficulty>()?)
                .estimated_time(estimate);
            if let Some(description) = description {
                new = new.description(description);
            }
            let task = dash.add_task(new)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { all } => {
            let tasks: Vec<_> = dash
                .progression()
                .tasks()
                .iter()
                .filter(|t| all || !t.completed)
                .collect();
            print_json(&tasks)?;
        }
        TaskAction::Rank => {
            print_json(&dash.progression().rank_tasks())?;
        }
        TaskAction::Complete { id } => match dash.complete_task(&id) {
            Some(events) => print_json(&events)?,
            None => return Err(format!("no open task with id {id}").into()),
        },
        TaskAction::Delete { id } => match dash.delete_task(&id) {
            Some(event) => print_json(&event)?,
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Review { id } => match dash.review_task(&id) {
            Some(events) => print_json(&events)?,
            None => {
                return Err(format!("task {id} is not completed or was already reviewed").into())
            }
        },
    }
    Ok(())
}
