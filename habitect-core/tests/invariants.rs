//! Property-based tests for the streak and analytics engines
//!
//! Randomized event histories exercise the guarantees the unit tests pin
//! with literal fixtures: streak lengths stay ordered and bounded, results
//! do not depend on input order, calendar views never have holes, and no
//! rate ever leaves its range or turns into NaN.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use uuid::Uuid;

use habitect_core::analytics::{heatmap, percentage};
use habitect_core::streak::{compute_streak, streak_history, HistoryOrder, WALK_CAP_DAYS};
use habitect_core::types::{
    Habit, HabitEvent, HabitEventType, HabitPolarity, JournalEntry, StreakType,
};
use habitect_core::weekly::{build_weekly_statistics, WeekWindow};

// ============================================
// Generators
// ============================================

/// All generated instants land on days 0..60 after this date.
fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn test_habit(polarity: HabitPolarity) -> Habit {
    Habit {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: "generated".to_string(),
        polarity,
        is_active: true,
    }
}

fn events_from(habit: &Habit, raw: &[(u16, u8, HabitEventType)]) -> Vec<HabitEvent> {
    raw.iter()
        .map(|&(day, hour, event_type)| HabitEvent {
            id: Uuid::new_v4(),
            habit_id: habit.id,
            user_id: habit.user_id,
            event_type,
            occurred_at: Utc
                .with_ymd_and_hms(2024, 1, 1, hour as u32, 0, 0)
                .unwrap()
                + Duration::days(day as i64),
            notes: None,
        })
        .collect()
}

fn entries_from(user_id: Uuid, raw: &[(u16, Option<u8>)]) -> Vec<JournalEntry> {
    raw.iter()
        .map(|&(day, mood_rating)| JournalEntry {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap()
                + Duration::days(day as i64),
            mood_rating,
        })
        .collect()
}

fn arb_event_type() -> impl Strategy<Value = HabitEventType> {
    prop_oneof![
        Just(HabitEventType::Completed),
        Just(HabitEventType::Skipped),
        Just(HabitEventType::Relapsed),
    ]
}

fn arb_polarity() -> impl Strategy<Value = HabitPolarity> {
    prop_oneof![Just(HabitPolarity::Build), Just(HabitPolarity::Avoid)]
}

/// `(day offset, hour, event type)` triples, zero to forty of them.
fn arb_raw_events() -> impl Strategy<Value = Vec<(u16, u8, HabitEventType)>> {
    prop::collection::vec((0u16..60, 0u8..24, arb_event_type()), 0..40)
}

fn arb_raw_entries() -> impl Strategy<Value = Vec<(u16, Option<u8>)>> {
    prop::collection::vec((0u16..21, prop::option::of(1u8..=10)), 0..20)
}

// ============================================
// Properties
// ============================================

proptest! {
    #[test]
    fn prop_current_never_exceeds_longest(
        raw in arb_raw_events(),
        polarity in arb_polarity(),
        today_offset in 0i64..70,
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw);
        let today = base_date() + Duration::days(today_offset);

        let result = compute_streak(&habit, &events, Tz::UTC, today);
        prop_assert!(result.current_streak <= result.longest_streak);
        prop_assert!(result.current_streak <= WALK_CAP_DAYS);
    }

    #[test]
    fn prop_streak_ignores_event_order(
        raw in arb_raw_events(),
        polarity in arb_polarity(),
        today_offset in 0i64..70,
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw);
        let mut reversed = events.clone();
        reversed.reverse();
        let today = base_date() + Duration::days(today_offset);

        prop_assert_eq!(
            compute_streak(&habit, &events, Tz::UTC, today),
            compute_streak(&habit, &reversed, Tz::UTC, today)
        );
    }

    #[test]
    fn prop_live_streaks_and_only_live_streaks_read_current(
        raw in arb_raw_events(),
        polarity in arb_polarity(),
        today_offset in 0i64..70,
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw);
        let today = base_date() + Duration::days(today_offset);

        let result = compute_streak(&habit, &events, Tz::UTC, today);
        prop_assert_eq!(
            result.current_streak > 0,
            result.streak_type == StreakType::Current
        );
    }

    #[test]
    fn prop_history_is_gap_free(
        raw in arb_raw_events(),
        polarity in arb_polarity(),
        window_days in 1u32..60,
        today_offset in 0i64..70,
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw);
        let today = base_date() + Duration::days(today_offset);

        let history =
            streak_history(&habit, &events, Tz::UTC, today, window_days, HistoryOrder::OldestFirst);

        prop_assert_eq!(history.len(), window_days as usize);
        prop_assert_eq!(history.last().unwrap().date, today);
        for pair in history.windows(2) {
            prop_assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
        }
    }

    #[test]
    fn prop_silent_history_days_contribute_only_for_avoid(
        raw in arb_raw_events(),
        polarity in arb_polarity(),
        today_offset in 0i64..70,
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw);
        let today = base_date() + Duration::days(today_offset);

        let history =
            streak_history(&habit, &events, Tz::UTC, today, 30, HistoryOrder::OldestFirst);

        for day in history.iter().filter(|d| !d.has_event) {
            prop_assert_eq!(day.contributes, polarity == HabitPolarity::Avoid);
            prop_assert_eq!(day.event_type, None);
        }
    }

    #[test]
    fn prop_heatmap_has_one_cell_per_day(
        raw in arb_raw_events(),
        start_offset in 0i64..30,
        span in 0i64..60,
    ) {
        let habit = test_habit(HabitPolarity::Build);
        let events = events_from(&habit, &raw);
        let start = base_date() + Duration::days(start_offset);
        let end = start + Duration::days(span);

        let cells = heatmap(&events, start, end, Tz::UTC);

        prop_assert_eq!(cells.len(), span as usize + 1);
        prop_assert_eq!(cells.first().unwrap().date, start);
        prop_assert_eq!(cells.last().unwrap().date, end);
        for cell in &cells {
            prop_assert!(cell.intensity <= 4);
        }
    }

    #[test]
    fn prop_percentage_is_finite_and_non_negative(
        part in 0usize..2000,
        whole in 0usize..2000,
    ) {
        let rate = percentage(part, whole);
        prop_assert!(rate.is_finite());
        prop_assert!(rate >= 0.0);
        if part <= whole {
            prop_assert!(rate <= 100.0);
        }
    }

    #[test]
    fn prop_weekly_statistics_stay_in_range(
        raw_events in arb_raw_events(),
        raw_entries in arb_raw_entries(),
        polarity in arb_polarity(),
    ) {
        let habit = test_habit(polarity);
        let events = events_from(&habit, &raw_events);
        let entries = entries_from(habit.user_id, &raw_entries);
        let habits = vec![habit.clone()];
        let week = WeekWindow::containing(base_date() + Duration::days(10));

        let stats =
            build_weekly_statistics(habit.user_id, week, &habits, &events, &entries, Tz::UTC);

        prop_assert!(stats.completion_rate.is_finite());
        prop_assert!(stats.completion_rate >= 0.0);
        prop_assert!(stats.rated_entry_count <= stats.entry_count);
        if let Some(average) = stats.average_mood {
            prop_assert!((1.0..=10.0).contains(&average));
        }
        if let Some(variance) = stats.mood_variance {
            prop_assert!(variance.is_finite());
            prop_assert!(variance >= 0.0);
        }
        for report in &stats.habits {
            prop_assert!(report.streak.current_streak <= report.streak.longest_streak);
            prop_assert!(report.analytics.consistency_score <= 100);
        }
    }
}
