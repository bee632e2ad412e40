//! Lesson commands, including spaced-repetition reviews.

use agenda_core::{ItemId, ItemKind, Lesson};
use chrono::NaiveDate;
use clap::Subcommand;

use super::{CmdResult, Context};

#[derive(Subcommand)]
pub enum LessonAction {
    /// Create a new lesson
    Add {
        /// Lesson title
        title: String,
        /// First review date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record a review and reschedule the lesson
    Review {
        /// Lesson index
        index: usize,
        /// Recall score, 0 (blackout) to 5 (perfect)
        #[arg(allow_negative_numbers = true)]
        score: f64,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a lesson
    Remove {
        /// Lesson index
        index: usize,
    },
}

pub fn run(ctx: &Context, action: LessonAction) -> CmdResult {
    let mut agenda = ctx.agenda()?;

    match action {
        LessonAction::Add {
            title,
            date,
            subject,
            notes,
        } => {
            let mut lesson = Lesson::new(title, date)
                .with_subject(subject.unwrap_or_default())
                .with_notes(notes.unwrap_or_default());
            lesson
                .schedule
                .set_duration(ctx.config.scheduling.default_duration_minutes)?;
            let id = agenda.add_lesson(lesson);
            ctx.save(&agenda)?;
            println!("Lesson created: {id}");
        }
        LessonAction::Review { index, score, json } => {
            let outcome = agenda.review_lesson(index, score, ctx.today())?;
            ctx.save(&agenda)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!(
                    "next review {} (interval {} days, repetitions {}, ease {:.2})",
                    outcome.next_review_date,
                    outcome.interval,
                    outcome.repetitions,
                    outcome.ease_factor
                );
            }
        }
        LessonAction::Remove { index } => {
            agenda.remove(ItemId::new(ItemKind::Lesson, index))?;
            ctx.save(&agenda)?;
            println!("Lesson removed: lesson#{index}");
        }
    }
    Ok(())
}
