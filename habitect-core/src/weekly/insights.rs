//! Weekly insights
//!
//! Small observations surfaced alongside the statistics: the strongest and
//! weakest habit of the week, the busiest logging day, and how many days
//! saw every active habit completed. Like achievements these are a closed
//! enum; the AI summary layer decides the phrasing, not this module.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HabitWeekReport, WeeklyStatistics};
use crate::calendar::civil_date;
use crate::types::{Habit, HabitEvent, HabitEventType};

/// A habit under this completion rate (percent) is flagged.
pub const NEEDS_ATTENTION_BELOW: f64 = 50.0;

/// An observation about the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Highest completion rate among habits with any events this week
    BestHabit {
        habit_id: Uuid,
        title: String,
        completion_rate: f64,
    },
    /// Lowest completion rate, under the attention threshold
    NeedsAttention {
        habit_id: Uuid,
        title: String,
        completion_rate: f64,
    },
    /// The day with the most logged events
    MostActiveDay { date: NaiveDate, events: usize },
    /// Days on which every active habit was completed
    PerfectDays { count: usize },
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insight::BestHabit {
                title,
                completion_rate,
                ..
            } => write!(f, "Best habit: {} at {:.0}%", title, completion_rate),
            Insight::NeedsAttention {
                title,
                completion_rate,
                ..
            } => write!(f, "Needs attention: {} at {:.0}%", title, completion_rate),
            Insight::MostActiveDay { date, events } => {
                write!(f, "Most active day: {} with {} events", date, events)
            }
            Insight::PerfectDays { count } => write!(f, "Perfect days: {}", count),
        }
    }
}

/// Derive the week's insights.
///
/// `habits` and `events` are the same slices the statistics were built
/// from; days are resolved in `tz`. A week with no habits and no events
/// yields an empty list, never an error.
pub fn weekly_insights(
    stats: &WeeklyStatistics,
    habits: &[Habit],
    events: &[HabitEvent],
    tz: Tz,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let week_events: Vec<&HabitEvent> = events
        .iter()
        .filter(|e| {
            let date = civil_date(e.occurred_at, tz);
            e.user_id == stats.user_id && date >= stats.week_start && date < stats.week_end
        })
        .collect();

    let best = best_of(&stats.habits);
    if let Some(report) = best {
        insights.push(Insight::BestHabit {
            habit_id: report.analytics.habit_id,
            title: report.analytics.title.clone(),
            completion_rate: report.analytics.completion_rate,
        });
    }

    if let Some(report) = worst_of(&stats.habits) {
        let is_best = best.map(|b| b.analytics.habit_id) == Some(report.analytics.habit_id);
        if report.analytics.completion_rate < NEEDS_ATTENTION_BELOW && !is_best {
            insights.push(Insight::NeedsAttention {
                habit_id: report.analytics.habit_id,
                title: report.analytics.title.clone(),
                completion_rate: report.analytics.completion_rate,
            });
        }
    }

    // busiest day, earliest on ties
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in &week_events {
        *per_day.entry(civil_date(event.occurred_at, tz)).or_insert(0) += 1;
    }
    let mut busiest: Option<(NaiveDate, usize)> = None;
    for (&date, &count) in &per_day {
        match busiest {
            Some((_, best_count)) if count <= best_count => {}
            _ => busiest = Some((date, count)),
        }
    }
    if let Some((date, events)) = busiest {
        insights.push(Insight::MostActiveDay { date, events });
    }

    let active: Vec<Uuid> = habits
        .iter()
        .filter(|h| h.user_id == stats.user_id && h.is_active)
        .map(|h| h.id)
        .collect();
    if !active.is_empty() {
        let mut completed_by_day: BTreeMap<NaiveDate, HashSet<Uuid>> = BTreeMap::new();
        for event in &week_events {
            if event.event_type == HabitEventType::Completed {
                completed_by_day
                    .entry(civil_date(event.occurred_at, tz))
                    .or_default()
                    .insert(event.habit_id);
            }
        }
        let count = completed_by_day
            .values()
            .filter(|done| active.iter().all(|id| done.contains(id)))
            .count();
        if count > 0 {
            insights.push(Insight::PerfectDays { count });
        }
    }

    insights
}

fn best_of(reports: &[HabitWeekReport]) -> Option<&HabitWeekReport> {
    let mut best: Option<&HabitWeekReport> = None;
    for report in reports.iter().filter(|r| r.analytics.total_events > 0) {
        match best {
            Some(b) if report.analytics.completion_rate <= b.analytics.completion_rate => {}
            _ => best = Some(report),
        }
    }
    best
}

fn worst_of(reports: &[HabitWeekReport]) -> Option<&HabitWeekReport> {
    let mut worst: Option<&HabitWeekReport> = None;
    for report in reports {
        match worst {
            Some(w) if report.analytics.completion_rate >= w.analytics.completion_rate => {}
            _ => worst = Some(report),
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::HabitAnalytics;
    use crate::types::{HabitPolarity, StreakResult, StreakType};
    use chrono::{DateTime, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn habit(user_id: Uuid, title: &str) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            polarity: HabitPolarity::Build,
            is_active: true,
        }
    }

    fn event_on(habit: &Habit, event_type: HabitEventType, day: NaiveDate) -> HabitEvent {
        let at = format!("{}T12:00:00Z", day);
        HabitEvent {
            id: Uuid::new_v4(),
            habit_id: habit.id,
            user_id: habit.user_id,
            event_type,
            occurred_at: DateTime::parse_from_rfc3339(&at)
                .unwrap()
                .with_timezone(&Utc),
            notes: None,
        }
    }

    fn report(habit: &Habit, completed: usize, total: usize, rate: f64) -> HabitWeekReport {
        HabitWeekReport {
            analytics: HabitAnalytics {
                habit_id: habit.id,
                title: habit.title.clone(),
                polarity: habit.polarity,
                window_days: 7,
                completed,
                skipped: total - completed,
                relapsed: 0,
                total_events: total,
                completion_rate: rate,
                consistency_score: 0,
                average_events_per_day: 0.0,
            },
            streak: StreakResult {
                habit_id: habit.id,
                current_streak: 0,
                longest_streak: 0,
                last_event_date: None,
                streak_type: StreakType::New,
            },
        }
    }

    fn stats_for(user_id: Uuid, habits: Vec<HabitWeekReport>) -> WeeklyStatistics {
        WeeklyStatistics {
            user_id,
            week_start: date(2024, 6, 9),
            week_end: date(2024, 6, 16),
            entry_count: 0,
            rated_entry_count: 0,
            average_mood: None,
            mood_variance: None,
            active_habits: habits.len(),
            completed_events: 0,
            completion_rate: 0.0,
            longest_streak: 0,
            habits,
        }
    }

    #[test]
    fn test_empty_week_yields_no_insights() {
        let stats = stats_for(Uuid::new_v4(), Vec::new());
        assert!(weekly_insights(&stats, &[], &[], chrono_tz::Tz::UTC).is_empty());
    }

    #[test]
    fn test_best_and_needs_attention() {
        let user = Uuid::new_v4();
        let strong = habit(user, "reading");
        let weak = habit(user, "running");
        let stats = stats_for(
            user,
            vec![report(&strong, 6, 6, 100.0), report(&weak, 1, 4, 25.0)],
        );
        let insights = weekly_insights(&stats, &[strong, weak], &[], chrono_tz::Tz::UTC);
        assert!(insights.iter().any(
            |i| matches!(i, Insight::BestHabit { title, .. } if title == "reading")
        ));
        assert!(insights.iter().any(
            |i| matches!(i, Insight::NeedsAttention { title, .. } if title == "running")
        ));
    }

    #[test]
    fn test_a_middling_habit_is_not_flagged() {
        let user = Uuid::new_v4();
        let h = habit(user, "reading");
        let stats = stats_for(user, vec![report(&h, 4, 6, 66.7)]);
        let insights = weekly_insights(&stats, &[h], &[], chrono_tz::Tz::UTC);
        assert!(!insights
            .iter()
            .any(|i| matches!(i, Insight::NeedsAttention { .. })));
    }

    #[test]
    fn test_most_active_day_prefers_earliest_on_ties() {
        let user = Uuid::new_v4();
        let h = habit(user, "reading");
        let events = vec![
            event_on(&h, HabitEventType::Completed, date(2024, 6, 10)),
            event_on(&h, HabitEventType::Completed, date(2024, 6, 12)),
        ];
        let stats = stats_for(user, Vec::new());
        let insights = weekly_insights(&stats, &[h], &events, chrono_tz::Tz::UTC);
        assert!(insights.iter().any(|i| matches!(
            i,
            Insight::MostActiveDay { date: d, events: 1 } if *d == date(2024, 6, 10)
        )));
    }

    #[test]
    fn test_perfect_days_require_every_active_habit() {
        let user = Uuid::new_v4();
        let a = habit(user, "reading");
        let b = habit(user, "running");
        let events = vec![
            // both done on the 10th, only one on the 11th
            event_on(&a, HabitEventType::Completed, date(2024, 6, 10)),
            event_on(&b, HabitEventType::Completed, date(2024, 6, 10)),
            event_on(&a, HabitEventType::Completed, date(2024, 6, 11)),
        ];
        let stats = stats_for(user, Vec::new());
        let insights = weekly_insights(&stats, &[a, b], &events, chrono_tz::Tz::UTC);
        assert!(insights
            .iter()
            .any(|i| matches!(i, Insight::PerfectDays { count: 1 })));
    }

    #[test]
    fn test_events_outside_the_window_do_not_count() {
        let user = Uuid::new_v4();
        let h = habit(user, "reading");
        let events = vec![event_on(&h, HabitEventType::Completed, date(2024, 6, 20))];
        let stats = stats_for(user, Vec::new());
        let insights = weekly_insights(&stats, &[h.clone()], &events, chrono_tz::Tz::UTC);
        assert!(!insights
            .iter()
            .any(|i| matches!(i, Insight::MostActiveDay { .. })));
    }
}
