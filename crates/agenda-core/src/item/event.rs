use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{hhmm, minute_of_day, ItemKind, PriorityItem, Schedule};
use crate::error::ValidationError;

/// A calendar event pinned to a date and clock time.
///
/// Events are fixed: the allocator records the interval they occupy and
/// never relocates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "due_date")]
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(flatten)]
    pub schedule: Schedule,
}

impl Event {
    pub fn new(title: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            date,
            time,
            schedule: Schedule::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Move the event to `start`. The event time and duration follow the
    /// new range, so the next allocation pass keeps it.
    ///
    /// # Errors
    /// Returns an error for an invalid range; the event is left untouched.
    pub fn set_time_range(
        &mut self,
        start: NaiveTime,
        end: Option<NaiveTime>,
    ) -> Result<(), ValidationError> {
        let mut schedule = self.schedule.clone();
        schedule.set_time_range(start, end)?;
        if let Some(end) = schedule.end_time() {
            schedule.set_duration(minute_of_day(end) - minute_of_day(start))?;
        }
        self.time = start;
        self.schedule = schedule;
        Ok(())
    }
}

impl PriorityItem for Event {
    fn title(&self) -> &str {
        &self.title
    }

    fn priority_date(&self) -> NaiveDate {
        self.date
    }

    fn priority_time(&self) -> Option<NaiveTime> {
        Some(self.time)
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Event
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }
}
