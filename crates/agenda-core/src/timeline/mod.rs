//! Prioritized views over the agenda.
//!
//! This module provides:
//! - The urgency ordering and a binary-heap priority queue
//! - Aggregation of the three collections into one ordered sequence
//! - Day-relative buckets (overdue/today, tomorrow, next week, later)
//! - Free block detection inside a workday window

mod aggregate;
mod bucket;
mod gap;
mod priority;

pub use aggregate::collect_prioritized;
pub use bucket::{bucket_by_day, sort_by_start_time, DayBucket, DayBuckets};
pub use gap::{detect_free_blocks, FreeBlockDetector, Interval};
pub use priority::{compare_priority, sort_by_priority, PriorityKey, PriorityQueue};
