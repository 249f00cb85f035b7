//! Streak engine
//!
//! Turns a habit's event history into current/longest streak lengths, a
//! streak classification, and a gap-free calendar history. Everything here
//! is a deterministic pure function: the caller supplies the events, the
//! timezone, and `today`, so tests can pin the clock.
//!
//! The two polarities walk differently:
//! - `build` streaks only exist on days with a contributing event. The one
//!   forgiveness is the grace window: an evaluation before today's event is
//!   logged must not show the streak as reset, so a missing day at the head
//!   of the walk is skipped as long as the last significant event is no
//!   older than yesterday.
//! - `avoid` streaks treat silence as success. Every day without a relapse
//!   counts, back to the first day the habit was ever logged. A day with a
//!   non-contributing event breaks the walk for both polarities, grace or
//!   not.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::debug;
use uuid::Uuid;

use crate::calendar::DateRange;
use crate::classify::{fold_daily, DayRecord};
use crate::error::Result;
use crate::types::{
    find_habit, Habit, HabitEvent, HabitPolarity, StreakDay, StreakResult, StreakType,
};

/// Days at the head of the walk a missing event is forgiven for.
pub const GRACE_WINDOW_DAYS: i64 = 1;

/// Upper bound on the backward walk, and therefore on any reported current
/// streak. Bounds the cost of pathological histories.
pub const WALK_CAP_DAYS: u32 = 365;

// ============================================
// Public operations
// ============================================

/// Compute the streak state for one habit as of `today`.
///
/// Events not belonging to `habit` are ignored, so the caller may pass a
/// user's whole event slice. A habit with no events reports zero lengths
/// and a `new` classification.
pub fn compute_streak(
    habit: &Habit,
    events: &[HabitEvent],
    tz: Tz,
    today: NaiveDate,
) -> StreakResult {
    let days = fold_daily(
        events.iter().filter(|e| e.habit_id == habit.id),
        habit.polarity,
        tz,
    );

    if days.is_empty() {
        return StreakResult {
            habit_id: habit.id,
            current_streak: 0,
            longest_streak: 0,
            last_event_date: None,
            streak_type: StreakType::New,
        };
    }

    let last_event_date = days.keys().next_back().copied();
    let current = match habit.polarity {
        HabitPolarity::Build => current_streak_build(&days, today),
        HabitPolarity::Avoid => current_streak_avoid(&days, today),
    };
    // An avoid streak can span days with no event at all, which the run
    // scan below cannot see, so the longest length is clamped from below.
    let longest = longest_run(&days).max(current);

    StreakResult {
        habit_id: habit.id,
        current_streak: current,
        longest_streak: longest,
        last_event_date,
        streak_type: classify_streak(habit.polarity, current, last_event_date, today),
    }
}

/// Look up a habit by id for `user_id` and compute its streak.
///
/// This is the engine's service-level entry point: an unknown habit, or a
/// habit owned by someone else, surfaces as `HabitNotFound`.
pub fn compute_streak_for(
    habits: &[Habit],
    user_id: Uuid,
    habit_id: Uuid,
    events: &[HabitEvent],
    tz: Tz,
    today: NaiveDate,
) -> Result<StreakResult> {
    let habit = find_habit(habits, user_id, habit_id)?;
    let result = compute_streak(habit, events, tz, today);
    debug!(
        habit_id = %habit.id,
        current = result.current_streak,
        longest = result.longest_streak,
        streak_type = result.streak_type.as_str(),
        "computed streak"
    );
    Ok(result)
}

/// Which end of a streak history comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
    OldestFirst,
    NewestFirst,
}

/// Calendar history for the trailing `window_days` days ending at `today`.
///
/// The result is total and gap-free: exactly one record per day, including
/// days with no event. For avoid habits a silent day is marked contributing
/// because the absence of a relapse is the success condition.
pub fn streak_history(
    habit: &Habit,
    events: &[HabitEvent],
    tz: Tz,
    today: NaiveDate,
    window_days: u32,
    order: HistoryOrder,
) -> Vec<StreakDay> {
    let days = fold_daily(
        events.iter().filter(|e| e.habit_id == habit.id),
        habit.polarity,
        tz,
    );

    let mut history: Vec<StreakDay> = DateRange::trailing(today, window_days)
        .iter()
        .map(|date| match days.get(&date) {
            Some(rec) => StreakDay {
                date,
                has_event: true,
                event_type: Some(rec.event_type),
                contributes: rec.contributes,
            },
            None => StreakDay {
                date,
                has_event: false,
                event_type: None,
                contributes: habit.polarity == HabitPolarity::Avoid,
            },
        })
        .collect();

    if order == HistoryOrder::NewestFirst {
        history.reverse();
    }
    history
}

// ============================================
// Walks
// ============================================

/// Backward walk for a build habit.
///
/// Dead unless the last significant event is today or yesterday. From that
/// event the walk counts strictly consecutive contributing days; the first
/// missing day or non-contributing event ends it.
fn current_streak_build(days: &BTreeMap<NaiveDate, DayRecord>, today: NaiveDate) -> u32 {
    let last = match days.keys().next_back() {
        Some(d) => *d,
        None => return 0,
    };
    if (today - last).num_days() > GRACE_WINDOW_DAYS {
        return 0;
    }

    let mut streak = 0u32;
    let mut day = last.min(today);
    while streak < WALK_CAP_DAYS {
        match days.get(&day) {
            Some(rec) if rec.contributes => {
                streak += 1;
                day -= Duration::days(1);
            }
            _ => break,
        }
    }
    streak
}

/// Backward walk for an avoid habit.
///
/// Counts every day back from `today` that either has a contributing event
/// or has no event at all, stopping at a relapse or at the first day the
/// habit was ever logged. Days before any logging exist are not counted as
/// avoidance.
fn current_streak_avoid(days: &BTreeMap<NaiveDate, DayRecord>, today: NaiveDate) -> u32 {
    let first = match days.keys().next() {
        Some(d) => *d,
        None => return 0,
    };

    let mut streak = 0u32;
    for offset in 0..WALK_CAP_DAYS {
        let day = today - Duration::days(offset as i64);
        if day < first {
            break;
        }
        match days.get(&day) {
            Some(rec) if rec.contributes => streak += 1,
            Some(_) => break,
            None => streak += 1,
        }
    }
    streak
}

/// Longest run of consecutive contributing dates in the folded history.
fn longest_run(days: &BTreeMap<NaiveDate, DayRecord>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for date in days
        .iter()
        .filter(|(_, rec)| rec.contributes)
        .map(|(date, _)| *date)
    {
        run = match prev {
            Some(p) if (date - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }
    longest
}

/// Classify the streak state.
///
/// Build habits break when the last significant event is older than the
/// grace window; a fresh zero with recent history reads as `new`. Avoid
/// habits are alive unless the walk came back empty.
fn classify_streak(
    polarity: HabitPolarity,
    current: u32,
    last_event_date: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakType {
    let last = match last_event_date {
        Some(d) => d,
        None => return StreakType::New,
    };
    match polarity {
        HabitPolarity::Build => {
            if (today - last).num_days() > GRACE_WINDOW_DAYS {
                StreakType::Broken
            } else if current == 0 {
                StreakType::New
            } else {
                StreakType::Current
            }
        }
        HabitPolarity::Avoid => {
            if current == 0 {
                StreakType::Broken
            } else {
                StreakType::Current
            }
        }
    }
}
