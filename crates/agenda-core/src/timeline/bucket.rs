//! Day-relative buckets over an ordered sequence.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::agenda::AgendaEntry;

/// Relative day a priority date falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBucket {
    /// Overdue or due today.
    OverdueToday,
    Tomorrow,
    /// After tomorrow, up to a week from today.
    Next7Days,
    Later,
}

impl DayBucket {
    pub const ALL: [DayBucket; 4] = [
        DayBucket::OverdueToday,
        DayBucket::Tomorrow,
        DayBucket::Next7Days,
        DayBucket::Later,
    ];

    pub fn classify(date: NaiveDate, today: NaiveDate) -> Self {
        match (date - today).num_days() {
            d if d <= 0 => Self::OverdueToday,
            1 => Self::Tomorrow,
            d if d <= 7 => Self::Next7Days,
            _ => Self::Later,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OverdueToday => "Overdue/Today",
            Self::Tomorrow => "Tomorrow",
            Self::Next7Days => "Next 7 days",
            Self::Later => "Later",
        }
    }
}

impl fmt::Display for DayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets in display order; every bucket is present, possibly empty.
pub type DayBuckets<'a> = BTreeMap<DayBucket, Vec<AgendaEntry<'a>>>;

/// Partition `ordered` into day buckets, keeping the input order inside
/// each bucket.
pub fn bucket_by_day<'a>(ordered: &[AgendaEntry<'a>], today: NaiveDate) -> DayBuckets<'a> {
    let mut buckets: DayBuckets<'a> = DayBucket::ALL
        .iter()
        .map(|bucket| (*bucket, Vec::new()))
        .collect();
    for entry in ordered {
        let bucket = DayBucket::classify(entry.item.priority_date(), today);
        buckets.entry(bucket).or_default().push(*entry);
    }
    buckets
}

/// Sentinel used for unscheduled items so they sort last.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Stable sort by assigned start time; unscheduled entries go last.
pub fn sort_by_start_time(entries: &mut [AgendaEntry<'_>]) {
    let sentinel = end_of_day();
    entries.sort_by_key(|entry| {
        let start = entry.item.schedule().start_time();
        (start.is_none(), start.unwrap_or(sentinel))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Agenda;
    use crate::item::Task;
    use crate::timeline::collect_prioritized;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    #[test]
    fn classify_boundaries() {
        let today = d(10);
        assert_eq!(DayBucket::classify(d(1), today), DayBucket::OverdueToday);
        assert_eq!(DayBucket::classify(d(10), today), DayBucket::OverdueToday);
        assert_eq!(DayBucket::classify(d(11), today), DayBucket::Tomorrow);
        assert_eq!(DayBucket::classify(d(12), today), DayBucket::Next7Days);
        assert_eq!(DayBucket::classify(d(17), today), DayBucket::Next7Days);
        assert_eq!(DayBucket::classify(d(18), today), DayBucket::Later);
    }

    #[test]
    fn every_bucket_present_and_order_kept() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("b", d(12)));
        agenda.add_task(Task::new("a", d(12)));
        agenda.add_task(Task::new("late", d(30)));
        let ordered = collect_prioritized(&agenda, d(10), None);
        let buckets = bucket_by_day(&ordered, d(10));

        assert_eq!(buckets.len(), 4);
        assert!(buckets[&DayBucket::OverdueToday].is_empty());
        assert!(buckets[&DayBucket::Tomorrow].is_empty());
        let next: Vec<_> = buckets[&DayBucket::Next7Days]
            .iter()
            .map(|e| e.item.title())
            .collect();
        assert_eq!(next, vec!["b", "a"]);
        assert_eq!(buckets[&DayBucket::Later].len(), 1);
    }

    #[test]
    fn unscheduled_sort_last() {
        let mut agenda = Agenda::new();
        agenda.add_task(Task::new("unscheduled", d(10)));
        agenda.add_task(Task::new("afternoon", d(10)));
        agenda.add_task(Task::new("morning", d(10)));
        agenda.tasks[1]
            .schedule
            .set_time_range(NaiveTime::from_hms_opt(14, 0, 0).unwrap(), None)
            .unwrap();
        agenda.tasks[2]
            .schedule
            .set_time_range(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), None)
            .unwrap();

        let mut entries: Vec<_> = agenda.entries().collect();
        sort_by_start_time(&mut entries);
        let titles: Vec<_> = entries.iter().map(|e| e.item.title()).collect();
        assert_eq!(titles, vec!["morning", "afternoon", "unscheduled"]);
    }

    #[test]
    fn labels() {
        assert_eq!(DayBucket::OverdueToday.to_string(), "Overdue/Today");
        assert_eq!(DayBucket::Next7Days.label(), "Next 7 days");
    }
}
