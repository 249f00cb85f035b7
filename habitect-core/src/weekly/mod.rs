//! Weekly statistics builder
//!
//! Composes the streak engine, the analytics aggregator, and journal facts
//! into the objects a weekly summary is written from: statistics,
//! achievements, insights, mood analysis, and per-habit breakdowns, with an
//! optional diff against the prior week and a simple extrapolation.
//!
//! Weeks are half-open, Sunday-anchored windows: `[week_start,
//! week_start + 7 days)`. A streak embedded in a weekly report is the same
//! streak `compute_streak` would return standalone for the week's final
//! day, so the two views can never disagree.

pub mod achievements;
pub mod compare;
pub mod insights;
pub mod mood;

pub use achievements::{evaluate_achievements, Achievement};
pub use compare::{compare, predict, ChangeDirection, WeeklyComparison, WeeklyPrediction};
pub use insights::{weekly_insights, Insight};
pub use mood::{analyze_mood, MoodAnalysis, MoodTrend};

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analytics::{per_habit_analytics, percentage, HabitAnalytics};
use crate::calendar::{civil_date, week_start_sunday, DateRange};
use crate::streak::compute_streak;
use crate::types::{Habit, HabitEvent, HabitEventType, JournalEntry, StreakResult};

// ============================================
// Week windows
// ============================================

/// A Sunday-anchored, half-open 7-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The week containing `date`, anchored to the Sunday on or before it.
    pub fn containing(date: NaiveDate) -> Self {
        WeekWindow {
            start: week_start_sunday(date),
        }
    }

    /// First day of the window (a Sunday).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end: the Sunday after `start`.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.start + Duration::days(7)
    }

    /// Final day inside the window (the Saturday).
    pub fn last_day(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    /// Inclusive date range covering the window.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.last_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end_exclusive()
    }

    /// The 7 days immediately preceding this window.
    pub fn previous(&self) -> WeekWindow {
        WeekWindow {
            start: self.start - Duration::days(7),
        }
    }
}

// ============================================
// Statistics
// ============================================

/// One habit's week: analytics over the window plus streak state as of the
/// window's final day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitWeekReport {
    pub analytics: HabitAnalytics,
    pub streak: StreakResult,
}

/// Aggregate journal and habit facts for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStatistics {
    pub user_id: Uuid,
    /// First day of the window (Sunday)
    pub week_start: NaiveDate,
    /// Exclusive end of the window (the next Sunday)
    pub week_end: NaiveDate,
    pub entry_count: usize,
    pub rated_entry_count: usize,
    pub average_mood: Option<f64>,
    pub mood_variance: Option<f64>,
    pub active_habits: usize,
    pub completed_events: usize,
    /// Completed events against `active_habits * 7` daily targets, percent
    pub completion_rate: f64,
    /// Best current streak across the user's habits, as of the final day
    pub longest_streak: u32,
    pub habits: Vec<HabitWeekReport>,
}

/// Which optional sections a weekly report carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyConfig {
    #[serde(default = "default_section_on")]
    pub include_comparison: bool,
    #[serde(default = "default_section_on")]
    pub include_prediction: bool,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        WeeklyConfig {
            include_comparison: true,
            include_prediction: true,
        }
    }
}

fn default_section_on() -> bool {
    true
}

/// Everything the summary layer consumes for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub statistics: WeeklyStatistics,
    pub mood: MoodAnalysis,
    pub achievements: Vec<Achievement>,
    pub insights: Vec<Insight>,
    pub comparison: Option<WeeklyComparison>,
    pub prediction: Option<WeeklyPrediction>,
}

// ============================================
// Builders
// ============================================

fn entries_in_week<'a>(
    entries: &'a [JournalEntry],
    user_id: Uuid,
    week: WeekWindow,
    tz: Tz,
) -> impl Iterator<Item = &'a JournalEntry> {
    entries
        .iter()
        .filter(move |e| e.user_id == user_id && week.contains(civil_date(e.created_at, tz)))
}

/// Build the statistics for one user's week.
///
/// Inputs may be unfiltered: events and entries belonging to other users,
/// or falling outside the window, are ignored here. Streaks are evaluated
/// with only the events known by the window's final day, so rebuilding a
/// past week later gives the same numbers. Missing data degrades to zeros
/// and `None`; nothing here fails.
pub fn build_weekly_statistics(
    user_id: Uuid,
    week: WeekWindow,
    habits: &[Habit],
    events: &[HabitEvent],
    entries: &[JournalEntry],
    tz: Tz,
) -> WeeklyStatistics {
    let user_habits: Vec<&Habit> = habits.iter().filter(|h| h.user_id == user_id).collect();
    let active_habits = user_habits.iter().filter(|h| h.is_active).count();

    let completed_events = events
        .iter()
        .filter(|e| {
            e.user_id == user_id
                && e.event_type == HabitEventType::Completed
                && week.contains(civil_date(e.occurred_at, tz))
        })
        .count();

    let mood = analyze_mood(entries_in_week(entries, user_id, week, tz));

    // events logged after the window must not leak into its streaks
    let known_by_week_end: Vec<HabitEvent> = events
        .iter()
        .filter(|e| civil_date(e.occurred_at, tz) <= week.last_day())
        .cloned()
        .collect();

    let habit_reports: Vec<HabitWeekReport> = user_habits
        .iter()
        .map(|habit| HabitWeekReport {
            analytics: per_habit_analytics(habit, events, week.range(), tz),
            streak: compute_streak(habit, &known_by_week_end, tz, week.last_day()),
        })
        .collect();

    let longest_streak = habit_reports
        .iter()
        .map(|r| r.streak.current_streak)
        .max()
        .unwrap_or(0);

    WeeklyStatistics {
        user_id,
        week_start: week.start(),
        week_end: week.end_exclusive(),
        entry_count: mood.entry_count,
        rated_entry_count: mood.rated_count,
        average_mood: mood.average,
        mood_variance: mood.variance,
        active_habits,
        completed_events,
        completion_rate: percentage(completed_events, active_habits * 7),
        longest_streak,
        habits: habit_reports,
    }
}

/// Build the full weekly report: statistics plus achievements, insights,
/// mood analysis, and the optional comparison and prediction sections.
pub fn build_weekly_report(
    user_id: Uuid,
    week: WeekWindow,
    habits: &[Habit],
    events: &[HabitEvent],
    entries: &[JournalEntry],
    tz: Tz,
    config: &WeeklyConfig,
) -> WeeklyReport {
    info!(%user_id, week_start = %week.start(), "building weekly report");

    let statistics = build_weekly_statistics(user_id, week, habits, events, entries, tz);
    let mood = analyze_mood(entries_in_week(entries, user_id, week, tz));
    let achievements = evaluate_achievements(&statistics);
    let insights = weekly_insights(&statistics, habits, events, tz);

    let previous = if config.include_comparison || config.include_prediction {
        Some(build_weekly_statistics(
            user_id,
            week.previous(),
            habits,
            events,
            entries,
            tz,
        ))
    } else {
        None
    };

    let comparison = previous
        .as_ref()
        .filter(|_| config.include_comparison)
        .map(|prev| compare(&statistics, prev));
    let prediction = previous
        .as_ref()
        .filter(|_| config.include_prediction)
        .map(|prev| predict(&statistics, prev));

    WeeklyReport {
        statistics,
        mood,
        achievements,
        insights,
        comparison,
        prediction,
    }
}
