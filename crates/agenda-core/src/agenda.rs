//! The agenda: owned task, event and lesson collections.
//!
//! Serializes as the `{"tasks": [...], "events": [...], "lessons": [...]}`
//! document exchanged with the store. Items are addressed by [`ItemId`],
//! i.e. their kind and position in the owning list.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::item::{Event, ItemId, ItemKind, Lesson, PriorityItem, Status, Task};
use crate::review::ReviewOutcome;
use crate::scheduler::AllocationPlan;
use crate::timeline::PriorityKey;

/// Borrowed view of one agenda item together with its id.
#[derive(Clone, Copy)]
pub struct AgendaEntry<'a> {
    pub id: ItemId,
    pub item: &'a dyn PriorityItem,
}

impl<'a> AgendaEntry<'a> {
    pub fn new(id: ItemId, item: &'a dyn PriorityItem) -> Self {
        Self { id, item }
    }

    pub fn key(&self) -> PriorityKey {
        PriorityKey::of(self.item)
    }
}

impl fmt::Debug for AgendaEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgendaEntry")
            .field("id", &self.id)
            .field("title", &self.item.title())
            .field("priority_date", &self.item.priority_date())
            .field("start_time", &self.item.schedule().start_time())
            .finish()
    }
}

/// Task, event and lesson collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agenda {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Agenda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON document form.
    ///
    /// # Errors
    /// Returns an error for malformed JSON, dates, times or zero durations.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the JSON document form, pretty-printed.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.tasks.len() + self.events.len() + self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len_of(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Task => self.tasks.len(),
            ItemKind::Event => self.events.len(),
            ItemKind::Lesson => self.lessons.len(),
        }
    }

    pub fn add_task(&mut self, task: Task) -> ItemId {
        self.tasks.push(task);
        ItemId::new(ItemKind::Task, self.tasks.len() - 1)
    }

    pub fn add_event(&mut self, event: Event) -> ItemId {
        self.events.push(event);
        ItemId::new(ItemKind::Event, self.events.len() - 1)
    }

    pub fn add_lesson(&mut self, lesson: Lesson) -> ItemId {
        self.lessons.push(lesson);
        ItemId::new(ItemKind::Lesson, self.lessons.len() - 1)
    }

    fn check_bounds(&self, id: ItemId) -> Result<(), ValidationError> {
        let len = self.len_of(id.kind);
        if id.index >= len {
            return Err(ValidationError::OutOfBounds {
                kind: id.kind,
                index: id.index,
                len,
            });
        }
        Ok(())
    }

    /// Delete an item. Later items of the same kind shift down by one.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds.
    pub fn remove(&mut self, id: ItemId) -> Result<(), ValidationError> {
        self.check_bounds(id)?;
        match id.kind {
            ItemKind::Task => {
                self.tasks.remove(id.index);
            }
            ItemKind::Event => {
                self.events.remove(id.index);
            }
            ItemKind::Lesson => {
                self.lessons.remove(id.index);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: ItemId) -> Option<&dyn PriorityItem> {
        match id.kind {
            ItemKind::Task => self.tasks.get(id.index).map(|t| t as &dyn PriorityItem),
            ItemKind::Event => self.events.get(id.index).map(|e| e as &dyn PriorityItem),
            ItemKind::Lesson => self.lessons.get(id.index).map(|l| l as &dyn PriorityItem),
        }
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut dyn PriorityItem> {
        match id.kind {
            ItemKind::Task => self
                .tasks
                .get_mut(id.index)
                .map(|t| t as &mut dyn PriorityItem),
            ItemKind::Event => self
                .events
                .get_mut(id.index)
                .map(|e| e as &mut dyn PriorityItem),
            ItemKind::Lesson => self
                .lessons
                .get_mut(id.index)
                .map(|l| l as &mut dyn PriorityItem),
        }
    }

    /// Every item in collection order: tasks, then events, then lessons.
    pub fn entries(&self) -> impl Iterator<Item = AgendaEntry<'_>> + '_ {
        let tasks = self.tasks.iter().enumerate().map(|(i, t)| {
            AgendaEntry::new(ItemId::new(ItemKind::Task, i), t as &dyn PriorityItem)
        });
        let events = self.events.iter().enumerate().map(|(i, e)| {
            AgendaEntry::new(ItemId::new(ItemKind::Event, i), e as &dyn PriorityItem)
        });
        let lessons = self.lessons.iter().enumerate().map(|(i, l)| {
            AgendaEntry::new(ItemId::new(ItemKind::Lesson, i), l as &dyn PriorityItem)
        });
        tasks.chain(events).chain(lessons)
    }

    /// Change the status of a task or lesson.
    ///
    /// # Errors
    /// Returns an error for events, which carry no status, or for an
    /// out-of-bounds index.
    pub fn set_status(&mut self, id: ItemId, status: Status) -> Result<(), ValidationError> {
        self.check_bounds(id)?;
        match id.kind {
            ItemKind::Task => self.tasks[id.index].status = status,
            ItemKind::Lesson => self.lessons[id.index].status = status,
            ItemKind::Event => {
                return Err(ValidationError::InvalidValue {
                    field: "status".to_string(),
                    message: "events do not carry a status".to_string(),
                })
            }
        }
        Ok(())
    }

    /// Record a review of the lesson at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds.
    pub fn review_lesson(
        &mut self,
        index: usize,
        score: f64,
        today: NaiveDate,
    ) -> Result<ReviewOutcome, ValidationError> {
        self.check_bounds(ItemId::new(ItemKind::Lesson, index))?;
        let lesson = &mut self.lessons[index];
        let outcome = lesson.record_review(score, today);
        debug!(
            lesson = %lesson.title,
            score,
            interval = outcome.interval,
            repetitions = outcome.repetitions,
            "lesson reviewed"
        );
        Ok(outcome)
    }

    /// Set an item's time range by hand.
    ///
    /// Events move to the new range; task and lesson times hold until the
    /// next allocation pass.
    ///
    /// # Errors
    /// Returns an error for an out-of-bounds index or an invalid range.
    pub fn set_time_range(
        &mut self,
        id: ItemId,
        start: NaiveTime,
        end: Option<NaiveTime>,
    ) -> Result<(), ValidationError> {
        self.check_bounds(id)?;
        if id.kind == ItemKind::Event {
            return match self.events.get_mut(id.index) {
                Some(event) => event.set_time_range(start, end),
                None => Ok(()),
            };
        }
        match self.get_mut(id) {
            Some(item) => item.schedule_mut().set_time_range(start, end),
            None => Ok(()),
        }
    }

    /// Change an item's duration.
    ///
    /// # Errors
    /// Returns an error for an out-of-bounds index or a zero duration.
    pub fn set_duration(&mut self, id: ItemId, minutes: u32) -> Result<(), ValidationError> {
        self.check_bounds(id)?;
        match self.get_mut(id) {
            Some(item) => item.schedule_mut().set_duration(minutes),
            None => Ok(()),
        }
    }

    /// Write an allocation pass back onto the items.
    ///
    /// Planned dates are cleared everywhere first, unscheduled candidates
    /// lose their stale times, then every assignment is applied. Ids that no
    /// longer resolve are skipped.
    pub fn apply_plan(&mut self, plan: &AllocationPlan) {
        for task in &mut self.tasks {
            task.schedule.clear_plan();
        }
        for event in &mut self.events {
            event.schedule.clear_plan();
        }
        for lesson in &mut self.lessons {
            lesson.schedule.clear_plan();
        }

        for id in &plan.unscheduled {
            if let Some(item) = self.get_mut(*id) {
                item.schedule_mut().clear_times();
            }
        }

        for assignment in &plan.assignments {
            if let Some(item) = self.get_mut(assignment.id) {
                item.schedule_mut()
                    .assign(assignment.date, assignment.start, assignment.end);
            }
        }
    }
}
