//! Slot allocation for tasks and lessons.
//!
//! This module assigns concrete time slots to open items:
//! - Records the intervals occupied by events (and configured reserved
//!   blocks) on each day of the horizon
//! - Detects the free blocks of each day inside the workday window,
//!   starting no earlier than "now" on the current day
//! - Fills blocks greedily, in priority order, carrying leftovers to the
//!   following day
//!
//! The allocator is pure: it returns an [`AllocationPlan`] which the caller
//! applies with [`Agenda::apply_plan`](crate::Agenda::apply_plan).

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agenda::AgendaEntry;
use crate::item::{hhmm, minute_of_day, time_at_minute, ItemId};
use crate::timeline::{FreeBlockDetector, Interval, PriorityKey};

/// Default number of days, today included, searched for free capacity.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Longest horizon the allocator will scan.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// A daily span kept free of allocations (meals, commute, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedBlock {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    pub duration_minutes: u32,
    /// Weekdays the block applies to; empty means every day.
    #[serde(default)]
    pub days: Vec<Weekday>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ReservedBlock {
    pub fn new(name: impl Into<String>, start: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            name: name.into(),
            start,
            duration_minutes,
            days: Vec::new(),
            enabled: true,
        }
    }

    pub fn applies_on(&self, weekday: Weekday) -> bool {
        self.enabled && (self.days.is_empty() || self.days.contains(&weekday))
    }

    fn interval(&self) -> Interval {
        Interval::starting_at(self.start, self.duration_minutes)
    }
}

/// Allocator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Workday window start
    pub work_start: NaiveTime,
    /// Workday window end
    pub work_end: NaiveTime,
    /// Days searched for free blocks, today included
    pub horizon_days: u32,
    /// Spans reserved on every matching day
    pub reserved_blocks: Vec<ReservedBlock>,
    /// Days on which nothing is placed
    pub non_working_days: Vec<Weekday>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            work_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            horizon_days: DEFAULT_HORIZON_DAYS,
            reserved_blocks: Vec::new(),
            non_working_days: Vec::new(),
        }
    }
}

/// Time slot given to one item by an allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub id: ItemId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Recorded event interval rather than a placement.
    pub fixed: bool,
}

impl ScheduleAssignment {
    pub fn interval(&self) -> Interval {
        Interval::new(minute_of_day(self.start), minute_of_day(self.end))
    }
}

/// Result of one allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Event intervals first, then placements in the order they were made.
    pub assignments: Vec<ScheduleAssignment>,
    /// Candidates that found no room within the horizon, in priority order.
    pub unscheduled: Vec<ItemId>,
}

impl AllocationPlan {
    pub fn assignment_for(&self, id: ItemId) -> Option<&ScheduleAssignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    pub fn placed_count(&self) -> usize {
        self.assignments.iter().filter(|a| !a.fixed).count()
    }
}

/// Greedy, priority-ordered slot allocator
pub struct SlotAllocator {
    config: SchedulerConfig,
}

struct Pending {
    id: ItemId,
    key: PriorityKey,
    minutes: u32,
}

impl SlotAllocator {
    /// Create a new allocator with default config
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Allocate slots for `candidates` as seen at `now`.
    ///
    /// Events among the candidates are recorded at their fixed time on
    /// every day of the horizon; every other candidate is placed in the
    /// first free block, scanning days from today and blocks in
    /// chronological order, that still has room for its duration once the
    /// more urgent items have been placed.
    ///
    /// # Arguments
    /// * `candidates` - Items to consider, ideally in priority order; ties
    ///   keep this order
    /// * `now` - Current date and wall-clock time
    pub fn allocate(&self, candidates: &[AgendaEntry<'_>], now: NaiveDateTime) -> AllocationPlan {
        let today = now.date();
        let days = self.horizon(today);
        let mut plan = AllocationPlan::default();

        // 1. Occupied intervals per day
        let mut occupied: BTreeMap<NaiveDate, Vec<Interval>> =
            days.iter().map(|day| (*day, self.reserved_on(*day))).collect();

        for entry in candidates.iter().filter(|e| e.item.is_fixed()) {
            let date = entry.item.priority_date();
            let Some(time) = entry.item.priority_time() else {
                continue;
            };
            let Some(day_slots) = occupied.get_mut(&date) else {
                continue;
            };
            let interval = Interval::starting_at(time, entry.item.duration_minutes());
            day_slots.push(interval);
            plan.assignments.push(ScheduleAssignment {
                id: entry.id,
                date,
                start: time,
                end: clipped_end(interval.end),
                fixed: true,
            });
            debug!(item = %entry.id, %date, start = %hhmm::format(time), "fixed event recorded");
        }

        // 2. Schedulable items in priority order
        let mut pending: Vec<Pending> = candidates
            .iter()
            .filter(|e| !e.item.is_fixed())
            .map(|e| Pending {
                id: e.id,
                key: e.key(),
                minutes: e.item.duration_minutes(),
            })
            .collect();
        pending.sort_by(|a, b| a.key.cmp(&b.key));

        // 3. Fill each day's free blocks, carrying leftovers forward
        let detector = FreeBlockDetector::new(self.config.work_start, self.config.work_end);
        for day in &days {
            if pending.is_empty() {
                break;
            }
            if self.config.non_working_days.contains(&day.weekday()) {
                continue;
            }

            let not_before = (*day == today).then(|| first_whole_minute(now.time()));
            let day_slots = occupied.entry(*day).or_default();
            let blocks = detector.find_blocks(day_slots, not_before);

            for block in blocks {
                let mut cursor = block.start;
                let mut i = 0;
                while i < pending.len() {
                    let end = cursor + pending[i].minutes;
                    if end > block.end {
                        i += 1;
                        continue;
                    }
                    let item = pending.remove(i);
                    let (Some(start_time), Some(end_time)) =
                        (time_at_minute(cursor), time_at_minute(end))
                    else {
                        // Unreachable while the window ends before midnight.
                        plan.unscheduled.push(item.id);
                        continue;
                    };
                    day_slots.push(Interval::new(cursor, end));
                    plan.assignments.push(ScheduleAssignment {
                        id: item.id,
                        date: *day,
                        start: start_time,
                        end: end_time,
                        fixed: false,
                    });
                    debug!(
                        item = %item.id,
                        date = %day,
                        start = %hhmm::format(start_time),
                        end = %hhmm::format(end_time),
                        "slot assigned"
                    );
                    cursor = end;
                }
            }
        }

        // 4. Whatever is left stays unscheduled
        if !pending.is_empty() {
            warn!(
                count = pending.len(),
                horizon_days = days.len(),
                "items left unscheduled within the horizon"
            );
        }
        plan.unscheduled.extend(pending.into_iter().map(|p| p.id));

        info!(
            placed = plan.placed_count(),
            fixed = plan.assignments.len() - plan.placed_count(),
            unscheduled = plan.unscheduled.len(),
            "allocation pass complete"
        );
        plan
    }

    fn horizon(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let span = self.config.horizon_days.clamp(1, MAX_HORIZON_DAYS);
        (0..span)
            .filter_map(|offset| today.checked_add_days(Days::new(u64::from(offset))))
            .collect()
    }

    fn reserved_on(&self, day: NaiveDate) -> Vec<Interval> {
        self.config
            .reserved_blocks
            .iter()
            .filter(|block| block.duration_minutes > 0 && block.applies_on(day.weekday()))
            .map(ReservedBlock::interval)
            .collect()
    }
}

impl Default for SlotAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Minute offset of `time`, rounded up when it falls inside a minute.
fn first_whole_minute(time: NaiveTime) -> u32 {
    let minute = minute_of_day(time);
    if time.second() > 0 || time.nanosecond() > 0 {
        minute + 1
    } else {
        minute
    }
}

/// Event end time on its own day; intervals running past midnight are
/// clipped to the last second of the day.
fn clipped_end(end_minute: u32) -> NaiveTime {
    time_at_minute(end_minute)
        .or_else(|| NaiveTime::from_hms_opt(23, 59, 59))
        .unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Agenda;
    use crate::item::{Event, ItemKind, Lesson, Task};
    use crate::timeline::collect_prioritized;
    use std::num::NonZeroU32;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_time(t(h, m))
    }

    fn minutes(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn run(agenda: &Agenda, now: NaiveDateTime, config: SchedulerConfig) -> AllocationPlan {
        let entries = collect_prioritized(agenda, now.date(), None);
        SlotAllocator::with_config(config).allocate(&entries, now)
    }

    fn slot(plan: &AllocationPlan, kind: ItemKind, index: usize) -> (NaiveDate, NaiveTime, NaiveTime) {
        let a = plan
            .assignment_for(ItemId::new(kind, index))
            .expect("item should be assigned");
        (a.date, a.start, a.end)
    }

    #[test]
    fn tasks_flow_around_an_event() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Meeting", d(1), t(10, 0)));
        agenda.add_task(Task::new("A", d(1)).with_estimate(minutes(90)));
        agenda.add_task(Task::new("B", d(1)).with_estimate(minutes(90)));

        let plan = run(&agenda, at(1, 8, 0), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Event, 0), (d(1), t(10, 0), t(11, 0)));
        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(1), t(8, 0), t(9, 30)));
        assert_eq!(slot(&plan, ItemKind::Task, 1), (d(1), t(11, 0), t(12, 30)));
        assert!(plan.unscheduled.is_empty());
    }

    #[test]
    fn narrow_block_hosts_a_later_shorter_item() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Meeting", d(1), t(10, 0)));
        agenda.add_task(Task::new("A", d(1)).with_estimate(minutes(90)));
        agenda.add_task(Task::new("B", d(1)).with_estimate(minutes(90)));
        agenda.add_task(Task::new("C", d(2)).with_estimate(minutes(30)));

        let plan = run(&agenda, at(1, 8, 0), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Task, 2), (d(1), t(9, 30), t(10, 0)));
        assert_eq!(slot(&plan, ItemKind::Task, 1), (d(1), t(11, 0), t(12, 30)));
    }

    #[test]
    fn starts_no_earlier_than_now() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("A", d(1)));

        let plan = run(&agenda, at(1, 13, 17), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(1), t(13, 17), t(14, 17)));
    }

    #[test]
    fn seconds_past_the_minute_round_up() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("A", d(1)));
        let now = d(1).and_time(NaiveTime::from_hms_opt(13, 17, 45).unwrap());

        let plan = run(&agenda, now, SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(1), t(13, 18), t(14, 18)));
        let placed = plan.assignment_for(ItemId::new(ItemKind::Task, 0)).unwrap();
        assert!(placed.date.and_time(placed.start) >= now);
    }

    #[test]
    fn last_seconds_of_the_day_leave_nothing_today() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("A", d(1)));
        let config = SchedulerConfig {
            work_end: NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            ..SchedulerConfig::default()
        };
        let now = d(1).and_time(NaiveTime::from_hms_opt(23, 58, 30).unwrap());

        let plan = run(&agenda, now, config);

        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(2), t(8, 0), t(9, 0)));
    }

    #[test]
    fn horizon_is_capped() {
        let allocator = SlotAllocator::with_config(SchedulerConfig {
            horizon_days: u32::MAX,
            ..SchedulerConfig::default()
        });
        assert_eq!(allocator.horizon(d(1)).len(), MAX_HORIZON_DAYS as usize);
    }

    #[test]
    fn zero_length_reserved_block_does_not_split_the_day() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("Whole day", d(1)).with_estimate(minutes(14 * 60)));
        let config = SchedulerConfig {
            reserved_blocks: vec![ReservedBlock::new("Nothing", t(12, 0), 0)],
            ..SchedulerConfig::default()
        };

        let plan = run(&agenda, at(1, 8, 0), config);

        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(1), t(8, 0), t(22, 0)));
    }

    #[test]
    fn overflow_spills_to_next_day() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("A", d(1)).with_estimate(minutes(90)));
        agenda.add_task(Task::new("B", d(1)).with_estimate(minutes(60)));

        let plan = run(&agenda, at(1, 20, 0), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(1), t(20, 0), t(21, 30)));
        assert_eq!(slot(&plan, ItemKind::Task, 1), (d(2), t(8, 0), t(9, 0)));
    }

    #[test]
    fn after_hours_starts_tomorrow() {
        let mut agenda = Agenda::new();
        agenda.add_lesson(Lesson::new("Algebra", d(1)));

        let plan = run(&agenda, at(1, 23, 0), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Lesson, 0), (d(2), t(8, 0), t(9, 0)));
    }

    #[test]
    fn future_day_events_reserve_their_interval() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Early class", d(2), t(8, 0)));
        agenda.add_task(Task::new("A", d(1)));

        let plan = run(&agenda, at(1, 22, 0), SchedulerConfig::default());

        assert_eq!(slot(&plan, ItemKind::Event, 0), (d(2), t(8, 0), t(9, 0)));
        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(2), t(9, 0), t(10, 0)));
    }

    #[test]
    fn events_outside_the_horizon_are_not_recorded() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Past", d(1), t(9, 0)));
        agenda.add_event(Event::new("Far", d(30), t(9, 0)));

        let plan = run(&agenda, at(2, 8, 0), SchedulerConfig::default());
        assert!(plan.assignments.is_empty());
    }

    #[test]
    fn oversized_item_stays_unscheduled() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("Marathon", d(1)).with_estimate(minutes(15 * 60)));
        agenda.add_task(Task::new("Short", d(1)));

        let plan = run(&agenda, at(1, 8, 0), SchedulerConfig::default());

        assert_eq!(plan.unscheduled, vec![ItemId::new(ItemKind::Task, 0)]);
        assert_eq!(slot(&plan, ItemKind::Task, 1), (d(1), t(8, 0), t(9, 0)));
    }

    #[test]
    fn horizon_bounds_the_search() {
        let mut agenda = Agenda::new();
        for i in 0..5 {
            agenda.add_task(Task::new(format!("T{i}"), d(1)).with_estimate(minutes(10 * 60)));
        }
        let config = SchedulerConfig {
            horizon_days: 3,
            ..SchedulerConfig::default()
        };

        let plan = run(&agenda, at(1, 8, 0), config);

        assert_eq!(plan.placed_count(), 3);
        assert_eq!(
            plan.unscheduled,
            vec![ItemId::new(ItemKind::Task, 3), ItemId::new(ItemKind::Task, 4)]
        );
    }

    #[test]
    fn reserved_blocks_and_non_working_days() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("A", d(3)).with_estimate(minutes(5 * 60)));
        // 2025-10-04 is a Saturday
        let config = SchedulerConfig {
            reserved_blocks: vec![ReservedBlock::new("Lunch", t(12, 0), 60)],
            non_working_days: vec![Weekday::Sat, Weekday::Sun],
            ..SchedulerConfig::default()
        };

        let plan = run(&agenda, at(3, 9, 0), config.clone());
        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(3), t(13, 0), t(18, 0)));

        let plan = run(&agenda, at(4, 9, 0), config);
        assert_eq!(slot(&plan, ItemKind::Task, 0), (d(6), t(13, 0), t(18, 0)));
    }

    #[test]
    fn late_event_end_is_clipped_to_midnight() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Night train", d(1), t(23, 30)));

        let plan = run(&agenda, at(1, 8, 0), SchedulerConfig::default());

        let (_, start, end) = slot(&plan, ItemKind::Event, 0);
        assert_eq!(start, t(23, 30));
        assert_eq!(end, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn allocation_is_deterministic() {
        let mut agenda = Agenda::new();
        agenda.add_event(Event::new("Meeting", d(1), t(10, 0)));
        for i in 0..6 {
            agenda.add_task(Task::new(format!("T{i}"), d(1 + i)).with_estimate(minutes(45 + 15 * i)));
        }
        let first = run(&agenda, at(1, 9, 10), SchedulerConfig::default());
        let second = run(&agenda, at(1, 9, 10), SchedulerConfig::default());
        assert_eq!(first, second);
    }
}
