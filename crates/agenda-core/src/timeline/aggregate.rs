//! Collects agenda items into one urgency-ordered sequence.

use chrono::NaiveDate;

use super::priority::PriorityQueue;
use crate::agenda::{Agenda, AgendaEntry};
use crate::item::PriorityItem;

/// Every open item of the agenda, most urgent first.
///
/// Completed tasks and lessons are skipped. With `days_range`, only items
/// due between `today` and `today + days_range` (inclusive) are kept, which
/// drops overdue items; without it overdue items lead the sequence.
/// Items that tie keep collection order (tasks, events, lessons).
pub fn collect_prioritized<'a>(
    agenda: &'a Agenda,
    today: NaiveDate,
    days_range: Option<u32>,
) -> Vec<AgendaEntry<'a>> {
    let mut queue = PriorityQueue::with_capacity(agenda.len());
    queue.extend(
        agenda
            .entries()
            .filter(|entry| !entry.item.is_completed())
            .filter(|entry| within_range(entry.item, today, days_range)),
    );
    queue.into_sorted_vec()
}

fn within_range(item: &dyn PriorityItem, today: NaiveDate, days_range: Option<u32>) -> bool {
    match days_range {
        Some(range) => {
            let days = item.days_remaining(today);
            days >= 0 && days <= i64::from(range)
        }
        None => true,
    }
}
