//! Weekly achievements
//!
//! Every rule is evaluated independently and all qualifying achievements
//! are emitted; they are not mutually exclusive. Kinds are a closed enum
//! so consumers can match exhaustively instead of parsing strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WeeklyStatistics;

/// Completion rate (percent) required for the consistency achievement.
pub const CONSISTENCY_THRESHOLD: f64 = 80.0;
/// Minimum average mood for the steady-mood achievement.
pub const STEADY_MOOD_MIN_AVERAGE: f64 = 7.0;
/// Mood variance must stay strictly under this for the steady-mood achievement.
pub const STEADY_MOOD_MAX_VARIANCE: f64 = 2.0;
/// Current streak length that earns the streak achievement.
pub const STREAK_THRESHOLD_DAYS: u32 = 7;
/// Journal entries in the week that earn the journaling achievement.
pub const JOURNALING_THRESHOLD_ENTRIES: usize = 5;

/// Something the user earned this week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Achievement {
    /// Hit at least 80% of the week's habit targets
    ConsistencyChampion { completion_rate: f64 },
    /// High average mood with little swing
    SteadyMood { average_mood: f64, variance: f64 },
    /// A habit's current streak reached a full week or more
    StreakKeeper {
        habit_id: Uuid,
        title: String,
        days: u32,
    },
    /// Journaled on most days of the week
    DedicatedJournaler { entries: usize },
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Achievement::ConsistencyChampion { completion_rate } => {
                write!(f, "Consistency champion: {:.0}% of targets met", completion_rate)
            }
            Achievement::SteadyMood { average_mood, .. } => {
                write!(f, "Steady mood: averaged {:.1} all week", average_mood)
            }
            Achievement::StreakKeeper { title, days, .. } => {
                write!(f, "Streak keeper: {} at {} days", title, days)
            }
            Achievement::DedicatedJournaler { entries } => {
                write!(f, "Dedicated journaler: {} entries", entries)
            }
        }
    }
}

/// Evaluate all achievement rules against one week's statistics.
///
/// The streak rule emits once, for the habit with the longest qualifying
/// current streak, rather than once per qualifying habit.
pub fn evaluate_achievements(stats: &WeeklyStatistics) -> Vec<Achievement> {
    let mut achievements = Vec::new();

    if stats.completion_rate >= CONSISTENCY_THRESHOLD {
        achievements.push(Achievement::ConsistencyChampion {
            completion_rate: stats.completion_rate,
        });
    }

    if let (Some(average), Some(variance)) = (stats.average_mood, stats.mood_variance) {
        if average >= STEADY_MOOD_MIN_AVERAGE && variance < STEADY_MOOD_MAX_VARIANCE {
            achievements.push(Achievement::SteadyMood {
                average_mood: average,
                variance,
            });
        }
    }

    if let Some(best) = stats
        .habits
        .iter()
        .max_by_key(|h| h.streak.current_streak)
    {
        if best.streak.current_streak >= STREAK_THRESHOLD_DAYS {
            achievements.push(Achievement::StreakKeeper {
                habit_id: best.streak.habit_id,
                title: best.analytics.title.clone(),
                days: best.streak.current_streak,
            });
        }
    }

    if stats.entry_count >= JOURNALING_THRESHOLD_ENTRIES {
        achievements.push(Achievement::DedicatedJournaler {
            entries: stats.entry_count,
        });
    }

    achievements
}
