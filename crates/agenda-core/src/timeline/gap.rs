//! Free block detection inside a workday window.
//!
//! Times are minute offsets from midnight. Occupied intervals may run past
//! midnight (an event starting late in the evening); only the part inside
//! the window matters.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::item::{minute_of_day, time_at_minute};

/// Half-open span `[start, end)` of minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Interval starting at `start` and lasting `minutes`.
    pub fn starting_at(start: NaiveTime, minutes: u32) -> Self {
        let start = minute_of_day(start);
        Self::new(start, start.saturating_add(minutes))
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= minutes
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        time_at_minute(self.start)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        time_at_minute(self.end)
    }
}

/// Finds the free blocks of one day.
pub struct FreeBlockDetector {
    window_start: u32,
    window_end: u32,
}

impl FreeBlockDetector {
    pub fn new(window_start: NaiveTime, window_end: NaiveTime) -> Self {
        Self {
            window_start: minute_of_day(window_start),
            window_end: minute_of_day(window_end),
        }
    }

    /// Free blocks between `occupied` intervals, in chronological order.
    ///
    /// The walk starts at the later of the window start and `not_before`
    /// (the current time when the day is today). Gaps are clipped to the
    /// window end; empty gaps and empty occupied intervals are dropped.
    pub fn find_blocks(&self, occupied: &[Interval], not_before: Option<u32>) -> Vec<Interval> {
        let mut blocks = Vec::new();

        let mut sorted: Vec<_> = occupied.to_vec();
        sorted.sort();

        let mut cursor = not_before.map_or(self.window_start, |n| n.max(self.window_start));
        if cursor >= self.window_end {
            return blocks;
        }

        for interval in &sorted {
            if interval.end <= cursor || interval.end <= interval.start {
                continue;
            }
            if interval.start >= self.window_end {
                break;
            }

            if interval.start > cursor {
                blocks.push(Interval::new(cursor, interval.start.min(self.window_end)));
            }

            cursor = interval.end.min(self.window_end);
            if cursor >= self.window_end {
                return blocks;
            }
        }

        if cursor < self.window_end {
            blocks.push(Interval::new(cursor, self.window_end));
        }

        blocks
    }
}

/// Convenience wrapper around [`FreeBlockDetector::find_blocks`].
pub fn detect_free_blocks(
    occupied: &[Interval],
    window_start: NaiveTime,
    window_end: NaiveTime,
    not_before: Option<NaiveTime>,
) -> Vec<Interval> {
    FreeBlockDetector::new(window_start, window_end)
        .find_blocks(occupied, not_before.map(minute_of_day))
}
