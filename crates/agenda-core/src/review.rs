//! Spaced-repetition review scheduling for lessons.
//!
//! Ease-factor scheme: a failed recall (score below 3) resets the
//! repetition count and brings the lesson back tomorrow; a successful one
//! grows the interval 1 → 6 → `interval * ease_factor` days and nudges the
//! ease factor by how easy the recall was.
//!
//! Scores are not range-checked. Anything the arithmetic accepts is used
//! as-is, and the ease factor floor keeps the result well-formed.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ease factor given to a lesson that has never been reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor a lesson can reach.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Scores at or above this count as a successful recall.
pub const PASSING_SCORE: f64 = 3.0;

fn default_ease_factor() -> f64 {
    INITIAL_EASE_FACTOR
}

/// Retention parameters stored on each lesson.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Days between the last review and the next one.
    #[serde(default)]
    pub interval: u32,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
        }
    }
}

/// Updated retention parameters returned by [`review`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    pub next_review_date: NaiveDate,
}

impl ReviewOutcome {
    pub fn state(&self) -> ReviewState {
        ReviewState {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }

    pub fn passed(&self) -> bool {
        self.repetitions > 0
    }
}

/// Compute the state after a review scored `score` on `today`.
///
/// Deterministic in `(state, score, today)`.
pub fn review(state: &ReviewState, score: f64, today: NaiveDate) -> ReviewOutcome {
    // Stored values below the floor are lifted before use.
    let mut ease_factor = state.ease_factor.max(MIN_EASE_FACTOR);
    let mut repetitions = state.repetitions;
    let interval;

    if score < PASSING_SCORE {
        repetitions = 0;
        interval = 1;
    } else {
        interval = match repetitions {
            0 => 1,
            1 => 6,
            _ => next_interval(state.interval, ease_factor),
        };
        repetitions = repetitions.saturating_add(1);

        let miss = 5.0 - score;
        ease_factor += 0.1 - miss * (0.08 + miss * 0.02);
        ease_factor = ease_factor.max(MIN_EASE_FACTOR);
    }

    if score <= MIN_EASE_FACTOR && ease_factor < MIN_EASE_FACTOR {
        ease_factor = MIN_EASE_FACTOR;
    }

    let next_review_date = today
        .checked_add_days(Days::new(u64::from(interval)))
        .unwrap_or(NaiveDate::MAX);

    ReviewOutcome {
        ease_factor,
        interval,
        repetitions,
        next_review_date,
    }
}

fn next_interval(interval: u32, ease_factor: f64) -> u32 {
    let grown = (f64::from(interval) * ease_factor).ceil();
    if grown >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        grown as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn failed_recall_resets_progress() {
        let state = ReviewState {
            repetitions: 3,
            ease_factor: 2.0,
            interval: 10,
        };
        let out = review(&state, 2.0, today());
        assert_eq!(out.repetitions, 0);
        assert_eq!(out.interval, 1);
        assert_close(out.ease_factor, 2.0);
        assert_eq!(out.next_review_date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
        assert!(!out.passed());
    }

    #[test]
    fn three_successes_follow_one_six_then_growth() {
        let mut state = ReviewState::default();
        let mut intervals = Vec::new();
        let mut ease_before_third = 0.0;
        for i in 0..3 {
            if i == 2 {
                ease_before_third = state.ease_factor;
            }
            let out = review(&state, 4.0, today());
            intervals.push(out.interval);
            state = out.state();
        }
        let expected_third = (6.0 * ease_before_third).ceil() as u32;
        assert_eq!(intervals, vec![1, 6, expected_third]);
        assert_eq!(expected_third, 15);
        assert_eq!(state.repetitions, 3);
    }

    #[test]
    fn ease_factor_moves_with_score() {
        let easy = review(&ReviewState::default(), 5.0, today());
        assert_close(easy.ease_factor, 2.6);

        let hard = review(&ReviewState::default(), 3.0, today());
        assert_close(hard.ease_factor, 2.36);

        let steady = review(&ReviewState::default(), 4.0, today());
        assert_close(steady.ease_factor, 2.5);
    }

    #[test]
    fn ease_factor_is_floored() {
        let state = ReviewState {
            repetitions: 4,
            ease_factor: 1.35,
            interval: 20,
        };
        let out = review(&state, 3.0, today());
        assert_close(out.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn stored_ease_below_floor_is_lifted() {
        let state = ReviewState {
            repetitions: 2,
            ease_factor: 0.9,
            interval: 6,
        };
        let out = review(&state, 1.0, today());
        assert_close(out.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(out.repetitions, 0);
    }

    #[test]
    fn negative_scores_follow_the_arithmetic() {
        let state = ReviewState {
            repetitions: 1,
            ease_factor: 2.5,
            interval: 1,
        };
        let out = review(&state, -4.0, today());
        assert_eq!(out.repetitions, 0);
        assert_eq!(out.interval, 1);
        assert!(out.ease_factor >= MIN_EASE_FACTOR);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let state = ReviewState {
            repetitions: 2,
            ease_factor: 2.2,
            interval: 6,
        };
        assert_eq!(review(&state, 3.5, today()), review(&state, 3.5, today()));
    }
}
