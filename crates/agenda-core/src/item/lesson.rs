use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ItemKind, PriorityItem, Schedule, Status};
use crate::review::{self, ReviewOutcome, ReviewState};

/// A study lesson reviewed on a spaced-repetition cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub subject: String,
    /// Date of the next review, recomputed on every review.
    #[serde(alias = "due_date")]
    pub next_review_date: NaiveDate,
    #[serde(flatten)]
    pub review: ReviewState,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub schedule: Schedule,
}

impl Lesson {
    pub fn new(title: impl Into<String>, next_review_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            notes: String::new(),
            subject: String::new(),
            next_review_date,
            review: ReviewState::default(),
            status: Status::Pending,
            schedule: Schedule::default(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_review_state(mut self, state: ReviewState) -> Self {
        self.review = state;
        self
    }

    /// Record a review with the given recall score and move the next
    /// review date accordingly.
    pub fn record_review(&mut self, score: f64, today: NaiveDate) -> ReviewOutcome {
        let outcome = review::review(&self.review, score, today);
        self.review = outcome.state();
        self.next_review_date = outcome.next_review_date;
        outcome
    }
}

impl PriorityItem for Lesson {
    fn title(&self) -> &str {
        &self.title
    }

    fn priority_date(&self) -> NaiveDate {
        self.next_review_date
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Lesson
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
