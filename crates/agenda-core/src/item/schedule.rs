//! Scheduling fields shared by every agenda item.

use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{hhmm, DEFAULT_DURATION_MINUTES};
use crate::error::ValidationError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes elapsed since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Clock time for a minute offset, `None` at or past midnight.
pub fn time_at_minute(minute: u32) -> Option<NaiveTime> {
    if minute >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

pub(crate) fn default_duration() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_DURATION_MINUTES).unwrap_or(NonZeroU32::MIN)
}

/// Assigned time range, duration and planned day of an item.
///
/// `end_time` is only ever set together with `start_time`, and always
/// strictly after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    start_time: Option<NaiveTime>,
    #[serde(
        default,
        with = "hhmm::option",
        skip_serializing_if = "Option::is_none"
    )]
    end_time: Option<NaiveTime>,
    #[serde(default = "default_duration", alias = "duration")]
    duration_minutes: NonZeroU32,
    /// Day the allocator placed the item on. Recomputed on every pass.
    #[serde(skip)]
    planned_date: Option<NaiveDate>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            start_time: None,
            end_time: None,
            duration_minutes: default_duration(),
            planned_date: None,
        }
    }
}

impl Schedule {
    pub fn with_duration(duration: NonZeroU32) -> Self {
        Self {
            duration_minutes: duration,
            ..Self::default()
        }
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes.get()
    }

    pub fn planned_date(&self) -> Option<NaiveDate> {
        self.planned_date
    }

    pub fn is_scheduled(&self) -> bool {
        self.start_time.is_some()
    }

    /// Set the time range by hand.
    ///
    /// Without an explicit `end`, the end is derived from the duration.
    ///
    /// # Errors
    /// Returns an error if the end is not after the start, or if the derived
    /// end would cross midnight.
    pub fn set_time_range(
        &mut self,
        start: NaiveTime,
        end: Option<NaiveTime>,
    ) -> Result<(), ValidationError> {
        let end = match end {
            Some(end) => end,
            None => time_at_minute(minute_of_day(start) + self.duration_minutes()).ok_or_else(
                || ValidationError::InvalidValue {
                    field: "start_time".to_string(),
                    message: format!(
                        "{} plus {} minutes crosses midnight",
                        hhmm::format(start),
                        self.duration_minutes()
                    ),
                },
            )?,
        };
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        self.start_time = Some(start);
        self.end_time = Some(end);
        Ok(())
    }

    /// Change the duration, recomputing the end time when a start is set.
    ///
    /// # Errors
    /// Returns an error for a zero duration, or when the recomputed end
    /// would cross midnight. The schedule is left untouched on error.
    pub fn set_duration(&mut self, minutes: u32) -> Result<(), ValidationError> {
        let duration = NonZeroU32::new(minutes).ok_or(ValidationError::InvalidDuration(minutes))?;
        if let Some(start) = self.start_time {
            let previous = self.duration_minutes;
            self.duration_minutes = duration;
            if let Err(err) = self.set_time_range(start, None) {
                self.duration_minutes = previous;
                return Err(err);
            }
        } else {
            self.duration_minutes = duration;
        }
        Ok(())
    }

    pub(crate) fn assign(&mut self, date: NaiveDate, start: NaiveTime, end: NaiveTime) {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.planned_date = Some(date);
    }

    pub(crate) fn clear_plan(&mut self) {
        self.planned_date = None;
    }

    pub(crate) fn clear_times(&mut self) {
        self.start_time = None;
        self.end_time = None;
    }
}
