//! Agenda item types.
//!
//! Tasks, events and lessons share one capability set, [`PriorityItem`],
//! which is all the ordering, aggregation and allocation code ever sees.

pub mod hhmm;
mod event;
mod lesson;
mod schedule;
mod task;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub use event::Event;
pub use lesson::Lesson;
pub use schedule::{minute_of_day, time_at_minute, Schedule};
pub use task::Task;

/// Duration given to items that do not set their own (minutes).
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Kind of agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    Event,
    Lesson,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
            Self::Lesson => "lesson",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "event" => Ok(Self::Event),
            "lesson" => Ok(Self::Lesson),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Progress status carried by tasks and lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Stable handle on an item: its kind plus its index in the owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    pub kind: ItemKind,
    pub index: usize,
}

impl ItemId {
    pub fn new(kind: ItemKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

/// Urgency label derived from the days left until the priority date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "label", content = "days")]
pub enum PriorityLabel {
    Overdue,
    Today,
    Tomorrow,
    InDays(i64),
}

impl PriorityLabel {
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d < 0 => Self::Overdue,
            0 => Self::Today,
            1 => Self::Tomorrow,
            d => Self::InDays(d),
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue => f.write_str("OVERDUE!"),
            Self::Today => f.write_str("TODAY!"),
            Self::Tomorrow => f.write_str("TOMORROW!"),
            Self::InDays(days) => write!(f, "{days} DAYS"),
        }
    }
}

/// Capabilities shared by every agenda item.
pub trait PriorityItem {
    fn title(&self) -> &str;

    /// Date used to rank the item's urgency.
    fn priority_date(&self) -> NaiveDate;

    /// Fixed clock time, only events have one.
    fn priority_time(&self) -> Option<NaiveTime> {
        None
    }

    fn kind(&self) -> ItemKind;

    /// Progress status; `None` for kinds that do not track one.
    fn status(&self) -> Option<Status> {
        None
    }

    fn schedule(&self) -> &Schedule;

    fn schedule_mut(&mut self) -> &mut Schedule;

    /// Fixed items are recorded by the allocator, never moved.
    fn is_fixed(&self) -> bool {
        self.kind() == ItemKind::Event
    }

    fn is_completed(&self) -> bool {
        self.status() == Some(Status::Completed)
    }

    fn duration_minutes(&self) -> u32 {
        self.schedule().duration_minutes()
    }

    fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.priority_date() - today).num_days()
    }

    fn priority_label(&self, today: NaiveDate) -> PriorityLabel {
        PriorityLabel::from_days_remaining(self.days_remaining(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_labels_follow_days_remaining() {
        assert_eq!(PriorityLabel::from_days_remaining(-3), PriorityLabel::Overdue);
        assert_eq!(PriorityLabel::from_days_remaining(0), PriorityLabel::Today);
        assert_eq!(PriorityLabel::from_days_remaining(1), PriorityLabel::Tomorrow);
        assert_eq!(PriorityLabel::from_days_remaining(4), PriorityLabel::InDays(4));
        assert_eq!(PriorityLabel::InDays(4).to_string(), "4 DAYS");
        assert_eq!(PriorityLabel::Overdue.to_string(), "OVERDUE!");
    }

    #[test]
    fn status_parses_cli_spellings() {
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("Completed".parse::<Status>(), Ok(Status::Completed));
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn item_id_display() {
        assert_eq!(ItemId::new(ItemKind::Lesson, 2).to_string(), "lesson#2");
    }
}
