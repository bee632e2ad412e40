//! Manual slot editing.
//!
//! Hand-set times on tasks and lessons are replaced by the next allocation
//! pass (`plan` or `today`). Setting an event's slot moves the event, so the
//! new time and length survive later passes.

use agenda_core::item::hhmm;
use agenda_core::{ItemId, ItemKind};
use chrono::NaiveTime;
use clap::Subcommand;

use super::{parse_time, CmdResult, Context};

#[derive(Subcommand)]
pub enum SlotAction {
    /// Set an item's start time, and optionally its end time
    Set {
        /// task, event or lesson
        kind: ItemKind,
        /// Item index
        index: usize,
        /// Start time (HH:MM)
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        /// End time (HH:MM); derived from the duration when omitted
        #[arg(long, value_parser = parse_time)]
        end: Option<NaiveTime>,
    },
    /// Change an item's duration
    Duration {
        /// task, event or lesson
        kind: ItemKind,
        /// Item index
        index: usize,
        /// Duration in minutes
        minutes: u32,
    },
}

pub fn run(ctx: &Context, action: SlotAction) -> CmdResult {
    let mut agenda = ctx.agenda()?;

    let id = match action {
        SlotAction::Set {
            kind,
            index,
            start,
            end,
        } => {
            let id = ItemId::new(kind, index);
            agenda.set_time_range(id, start, end)?;
            id
        }
        SlotAction::Duration {
            kind,
            index,
            minutes,
        } => {
            let id = ItemId::new(kind, index);
            agenda.set_duration(id, minutes)?;
            id
        }
    };

    ctx.save(&agenda)?;
    if let Some(item) = agenda.get(id) {
        let schedule = item.schedule();
        match (schedule.start_time(), schedule.end_time()) {
            (Some(start), Some(end)) => println!(
                "{id}: {}-{} ({} min)",
                hhmm::format(start),
                hhmm::format(end),
                schedule.duration_minutes()
            ),
            _ => println!("{id}: {} min", schedule.duration_minutes()),
        }
    }
    Ok(())
}
