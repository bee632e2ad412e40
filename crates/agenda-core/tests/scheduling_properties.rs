//! Property tests for the allocation pass and the review scheduler.

use std::num::NonZeroU32;

use agenda_core::timeline::Interval;
use agenda_core::{
    bucket_by_day, collect_prioritized, review, Agenda, Event, Lesson, Planner, ReservedBlock,
    ReviewState, SchedulerConfig, Task,
};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
}

fn day(offset: u32) -> NaiveDate {
    base().checked_add_days(Days::new(u64::from(offset))).unwrap()
}

fn time(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).unwrap()
}

#[derive(Debug, Clone)]
struct Fixture {
    tasks: Vec<(u32, u32)>,
    events: Vec<(u32, u32, u32)>,
    lessons: Vec<(u32, u32)>,
}

fn fixture_strategy() -> impl Strategy<Value = Fixture> {
    (
        prop::collection::vec((0u32..20, 1u32..=240), 0..12),
        prop::collection::vec((0u32..20, 0u32..(24 * 4), 15u32..=180), 0..8),
        prop::collection::vec((0u32..20, 1u32..=120), 0..6),
    )
        .prop_map(|(tasks, events, lessons)| Fixture {
            tasks,
            // quarter-hour event starts
            events: events
                .into_iter()
                .map(|(d, quarter, minutes)| (d, quarter * 15, minutes))
                .collect(),
            lessons,
        })
}

fn build(fixture: &Fixture) -> Agenda {
    let mut agenda = Agenda::new();
    for (i, (offset, minutes)) in fixture.tasks.iter().enumerate() {
        agenda.add_task(
            Task::new(format!("task {i}"), day(*offset))
                .with_estimate(NonZeroU32::new(*minutes).unwrap()),
        );
    }
    for (i, (offset, start, minutes)) in fixture.events.iter().enumerate() {
        let mut event = Event::new(format!("event {i}"), day(*offset), time(*start));
        event.schedule.set_duration(*minutes).unwrap();
        agenda.add_event(event);
    }
    for (i, (offset, minutes)) in fixture.lessons.iter().enumerate() {
        let mut lesson = Lesson::new(format!("lesson {i}"), day(*offset));
        lesson.schedule.set_duration(*minutes).unwrap();
        agenda.add_lesson(lesson);
    }
    agenda
}

fn lunch_config() -> SchedulerConfig {
    SchedulerConfig {
        reserved_blocks: vec![ReservedBlock::new("Lunch", time(12 * 60), 60)],
        ..SchedulerConfig::default()
    }
}

fn now_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(h, m, s)| base().and_time(NaiveTime::from_hms_opt(h, m, s).unwrap()))
}

proptest! {
    #[test]
    fn placements_never_overlap(fixture in fixture_strategy(), now in now_strategy()) {
        let mut agenda = build(&fixture);
        let plan = Planner::new(lunch_config()).allocate(&mut agenda, now);
        let lunch = Interval::new(12 * 60, 13 * 60);

        for (i, a) in plan.assignments.iter().enumerate() {
            if a.fixed {
                continue;
            }
            prop_assert!(!a.interval().overlaps(&lunch), "{:?} overlaps lunch", a);
            for (j, b) in plan.assignments.iter().enumerate() {
                if i != j && a.date == b.date {
                    prop_assert!(
                        !a.interval().overlaps(&b.interval()),
                        "{:?} overlaps {:?}", a, b
                    );
                }
            }
        }
    }

    #[test]
    fn placements_stay_inside_the_window(fixture in fixture_strategy(), now in now_strategy()) {
        let mut agenda = build(&fixture);
        let config = SchedulerConfig::default();
        let plan = Planner::new(config.clone()).allocate(&mut agenda, now);

        for a in plan.assignments.iter().filter(|a| !a.fixed) {
            prop_assert!(a.start >= config.work_start);
            prop_assert!(a.end <= config.work_end);
            prop_assert!(a.start < a.end);
            prop_assert!(a.date.and_time(a.start) >= now, "{:?} starts before {}", a, now);
        }
    }

    #[test]
    fn every_open_item_is_placed_once_or_left_unscheduled(
        fixture in fixture_strategy(),
        now in now_strategy(),
    ) {
        let mut agenda = build(&fixture);
        let plan = Planner::default().allocate(&mut agenda, now);

        let schedulable = agenda.tasks.len() + agenda.lessons.len();
        prop_assert_eq!(plan.placed_count() + plan.unscheduled.len(), schedulable);

        for task in &agenda.tasks {
            match task.schedule.planned_date() {
                Some(_) => prop_assert!(task.schedule.is_scheduled()),
                None => prop_assert!(task.schedule.start_time().is_none()),
            }
        }
    }

    #[test]
    fn allocation_is_deterministic_and_idempotent(
        fixture in fixture_strategy(),
        now in now_strategy(),
    ) {
        let planner = Planner::new(lunch_config());
        let mut first = build(&fixture);
        let mut second = build(&fixture);

        let plan_a = planner.allocate(&mut first, now);
        let plan_b = planner.allocate(&mut second, now);
        prop_assert_eq!(&plan_a, &plan_b);

        let again = planner.allocate(&mut first, now);
        prop_assert_eq!(&plan_a, &again);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn buckets_partition_the_ordered_items(fixture in fixture_strategy(), offset in 0u32..10) {
        let agenda = build(&fixture);
        let today = day(offset);
        let ordered = collect_prioritized(&agenda, today, None);
        let buckets = bucket_by_day(&ordered, today);

        prop_assert_eq!(buckets.len(), 4);
        let total: usize = buckets.values().map(Vec::len).sum();
        prop_assert_eq!(total, ordered.len());

        let flattened: Vec<_> = buckets.values().flatten().map(|e| e.id).collect();
        let original: Vec<_> = ordered.iter().map(|e| e.id).collect();
        prop_assert_eq!(flattened, original);
    }

    #[test]
    fn ordering_is_non_decreasing(fixture in fixture_strategy()) {
        let agenda = build(&fixture);
        let ordered = collect_prioritized(&agenda, base(), None);
        for pair in ordered.windows(2) {
            prop_assert!(pair[0].key() <= pair[1].key());
        }
    }

    #[test]
    fn ease_factor_never_drops_below_floor(
        repetitions in 0u32..20,
        ease_factor in 0.5f64..4.0,
        interval in 1u32..400,
        scores in prop::collection::vec(-2.0f64..7.0, 1..12),
    ) {
        let mut state = ReviewState { repetitions, ease_factor, interval };
        let today = base();
        for score in scores {
            let outcome = review(&state, score, today);
            prop_assert!(outcome.ease_factor >= 1.3);
            prop_assert!(outcome.interval >= 1);
            prop_assert!(outcome.next_review_date > today);
            if score < 3.0 {
                prop_assert_eq!(outcome.repetitions, 0);
                prop_assert_eq!(outcome.interval, 1);
            } else {
                prop_assert_eq!(outcome.repetitions, state.repetitions + 1);
            }
            state = outcome.state();
        }
    }
}
