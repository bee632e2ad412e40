//! Task management commands for CLI.

use std::num::NonZeroU32;

use agenda_core::{ItemId, ItemKind, Status, Task};
use chrono::NaiveDate;
use clap::Subcommand;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
        /// Estimated minutes (default: scheduling.default_duration_minutes)
        #[arg(long)]
        minutes: Option<NonZeroU32>,
    },
    /// Change a task's status
    Status {
        /// Task index
        index: usize,
        /// pending, in-progress or completed
        status: Status,
    },
    /// Delete a task
    Remove {
        /// Task index
        index: usize,
    },
}

pub fn run(ctx: &Context, action: TaskAction) -> CmdResult {
    let mut agenda = ctx.agenda()?;

    match action {
        TaskAction::Add {
            title,
            due,
            minutes,
        } => {
            let minutes = match minutes {
                Some(minutes) => minutes,
                None => NonZeroU32::new(ctx.config.scheduling.default_duration_minutes)
                    .ok_or("scheduling.default_duration_minutes must be at least 1")?,
            };
            let id = agenda.add_task(Task::new(title, due).with_estimate(minutes));
            ctx.save(&agenda)?;
            println!("Task created: {id}");
        }
        TaskAction::Status { index, status } => {
            agenda.set_status(ItemId::new(ItemKind::Task, index), status)?;
            ctx.save(&agenda)?;
            println!("task#{index} is now {}", status.as_str());
        }
        TaskAction::Remove { index } => {
            agenda.remove(ItemId::new(ItemKind::Task, index))?;
            ctx.save(&agenda)?;
            println!("Task removed: task#{index}");
        }
    }
    Ok(())
}
