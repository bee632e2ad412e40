//! # Agenda Core Library
//!
//! This library provides the prioritization and scheduling engine behind the
//! `agenda` CLI. Tasks, calendar events and study lessons are mixed into one
//! urgency-ordered view, bucketed by day, and given concrete time slots
//! around fixed events inside a bounded workday.
//!
//! ## Architecture
//!
//! - **Items**: [`Task`], [`Event`] and [`Lesson`], all exposed through the
//!   [`PriorityItem`] capability set
//! - **Timeline**: urgency ordering, aggregation, day buckets and free block
//!   detection
//! - **Scheduler**: the greedy [`SlotAllocator`] with overflow to later days
//! - **Review**: ease-factor spaced repetition for lessons
//! - **Storage**: JSON agenda document and TOML configuration
//!
//! ## Key Components
//!
//! - [`Agenda`]: Owned item collections and editing operations
//! - [`Planner`]: Allocation pass plus the bucketed and today views
//! - [`Config`]: Application configuration management
//! - [`AgendaStore`]: Agenda document persistence

pub mod agenda;
pub mod error;
pub mod item;
pub mod planner;
pub mod review;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use agenda::{Agenda, AgendaEntry};
pub use error::{ConfigError, CoreError, ValidationError};
pub use item::{
    Event, ItemId, ItemKind, Lesson, PriorityItem, PriorityLabel, Schedule, Status, Task,
    DEFAULT_DURATION_MINUTES,
};
pub use planner::Planner;
pub use review::{review, ReviewOutcome, ReviewState};
pub use scheduler::{
    AllocationPlan, ReservedBlock, ScheduleAssignment, SchedulerConfig, SlotAllocator,
    DEFAULT_HORIZON_DAYS, MAX_HORIZON_DAYS,
};
pub use storage::{AgendaStore, Config, SchedulingConfig, WorkdayConfig};
pub use timeline::{
    bucket_by_day, collect_prioritized, compare_priority, sort_by_priority, sort_by_start_time,
    DayBucket, DayBuckets, PriorityKey, PriorityQueue,
};
