//! Full planning pass over an agenda.
//!
//! Aggregates the open items, runs the slot allocator over all of them at
//! once (so overflow crosses bucket boundaries), writes the assignments back
//! and builds the day views.

use chrono::NaiveDateTime;

use crate::agenda::{Agenda, AgendaEntry};
use crate::item::{ItemKind, PriorityItem};
use crate::scheduler::{AllocationPlan, SchedulerConfig, SlotAllocator};
use crate::timeline::{bucket_by_day, collect_prioritized, sort_by_start_time, DayBuckets};

/// Runs allocation passes and builds the prioritized views.
#[derive(Default)]
pub struct Planner {
    allocator: SlotAllocator,
}

impl Planner {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            allocator: SlotAllocator::with_config(config),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        self.allocator.config()
    }

    /// Allocate slots for every open item and apply them to the agenda.
    pub fn allocate(&self, agenda: &mut Agenda, now: NaiveDateTime) -> AllocationPlan {
        let plan = {
            let ordered = collect_prioritized(agenda, now.date(), None);
            self.allocator.allocate(&ordered, now)
        };
        agenda.apply_plan(&plan);
        plan
    }

    /// Day buckets after a full allocation pass, each sorted by start time
    /// with unscheduled items last.
    pub fn bucketed<'a>(&self, agenda: &'a mut Agenda, now: NaiveDateTime) -> DayBuckets<'a> {
        self.allocate(agenda, now);
        let agenda: &'a Agenda = agenda;
        let today = now.date();
        let ordered = collect_prioritized(agenda, today, None);
        let mut buckets = bucket_by_day(&ordered, today);
        for entries in buckets.values_mut() {
            sort_by_start_time(entries);
        }
        buckets
    }

    /// What happens today: today's events plus the tasks and lessons the
    /// allocator placed on today, sorted by start time.
    pub fn today_plan<'a>(&self, agenda: &'a mut Agenda, now: NaiveDateTime) -> Vec<AgendaEntry<'a>> {
        self.allocate(agenda, now);
        let agenda: &'a Agenda = agenda;
        let today = now.date();
        let mut entries: Vec<_> = collect_prioritized(agenda, today, None)
            .into_iter()
            .filter(|entry| is_today(entry.item, today))
            .collect();
        sort_by_start_time(&mut entries);
        entries
    }
}

fn is_today(item: &dyn PriorityItem, today: chrono::NaiveDate) -> bool {
    match item.kind() {
        ItemKind::Event => item.priority_date() == today,
        ItemKind::Task | ItemKind::Lesson => item.schedule().planned_date() == Some(today),
    }
}
