use agenda_core::{Event, ItemId, ItemKind};
use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;

use super::{parse_time, CmdResult, Context};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a new event
    Add {
        /// Event title
        title: String,
        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        /// Event description
        #[arg(long)]
        description: Option<String>,
        /// Duration in minutes (default: scheduling.default_duration_minutes)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Delete an event
    Remove {
        /// Event index
        index: usize,
    },
}

pub fn run(ctx: &Context, action: EventAction) -> CmdResult {
    let mut agenda = ctx.agenda()?;

    match action {
        EventAction::Add {
            title,
            date,
            time,
            description,
            minutes,
        } => {
            let mut event = Event::new(title, date, time);
            if let Some(description) = description {
                event = event.with_description(description);
            }
            event
                .schedule
                .set_duration(minutes.unwrap_or(ctx.config.scheduling.default_duration_minutes))?;
            let id = agenda.add_event(event);
            ctx.save(&agenda)?;
            println!("Event created: {id}");
        }
        EventAction::Remove { index } => {
            agenda.remove(ItemId::new(ItemKind::Event, index))?;
            ctx.save(&agenda)?;
            println!("Event removed: event#{index}");
        }
    }
    Ok(())
}
