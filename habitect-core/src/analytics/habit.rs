//! Per-habit metrics over a date window

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::percentage;
use crate::calendar::{civil_date, DateRange};
use crate::types::{Habit, HabitEvent, HabitEventType, HabitPolarity};

/// Event counts and derived scores for one habit over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitAnalytics {
    pub habit_id: Uuid,
    pub title: String,
    pub polarity: HabitPolarity,
    pub window_days: u32,
    pub completed: usize,
    pub skipped: usize,
    pub relapsed: usize,
    pub total_events: usize,
    /// Completed share of the habit's events in the window, as a percentage
    pub completion_rate: f64,
    /// How regularly the habit gets logged: `round(events / window days * 100)`,
    /// capped at 100 so multiple logs per day cannot exceed full marks
    pub consistency_score: u32,
    pub average_events_per_day: f64,
}

/// Reduce one habit's events inside `window` to counts and scores.
///
/// Raw events are counted, not per-day folded dispositions: logging twice
/// on one day is two events here. Window membership is decided by the civil
/// date each event falls on in `tz`.
pub fn per_habit_analytics(
    habit: &Habit,
    events: &[HabitEvent],
    window: DateRange,
    tz: Tz,
) -> HabitAnalytics {
    let mut completed = 0usize;
    let mut skipped = 0usize;
    let mut relapsed = 0usize;

    for event in events
        .iter()
        .filter(|e| e.habit_id == habit.id && window.contains(civil_date(e.occurred_at, tz)))
    {
        match event.event_type {
            HabitEventType::Completed => completed += 1,
            HabitEventType::Skipped => skipped += 1,
            HabitEventType::Relapsed => relapsed += 1,
        }
    }

    let total = completed + skipped + relapsed;
    let window_days = window.num_days().max(1) as u32;
    let consistency = ((total as f64 / window_days as f64) * 100.0).round() as u32;

    HabitAnalytics {
        habit_id: habit.id,
        title: habit.title.clone(),
        polarity: habit.polarity,
        window_days,
        completed,
        skipped,
        relapsed,
        total_events: total,
        completion_rate: percentage(completed, total),
        consistency_score: consistency.min(100),
        average_events_per_day: total as f64 / window_days as f64,
    }
}
