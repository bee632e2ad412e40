use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ItemKind, PriorityItem, Schedule, Status};

/// A to-do with a due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: Status,
    /// User estimate; seeds the scheduling duration when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<NonZeroU32>,
    #[serde(flatten)]
    pub schedule: Schedule,
}

impl Task {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due_date,
            status: Status::Pending,
            estimated_minutes: None,
            schedule: Schedule::default(),
        }
    }

    pub fn with_estimate(mut self, minutes: NonZeroU32) -> Self {
        self.estimated_minutes = Some(minutes);
        self.schedule = Schedule::with_duration(minutes);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

impl PriorityItem for Task {
    fn title(&self) -> &str {
        &self.title
    }

    fn priority_date(&self) -> NaiveDate {
        self.due_date
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Task
    }

    fn status(&self) -> Option<Status> {
        Some(self.status)
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }
}
