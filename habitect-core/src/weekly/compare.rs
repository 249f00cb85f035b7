//! Week-over-week comparison and extrapolation
//!
//! The comparison is a pure diff of two already-built statistics objects;
//! it never recomputes anything. Direction labels only appear when the
//! change is big enough to mean something, so small wobbles read as no
//! change rather than noise.

use serde::{Deserialize, Serialize};

use super::WeeklyStatistics;

/// Completion rate must move more than this many points to get a label.
pub const COMPLETION_DELTA_THRESHOLD: f64 = 5.0;
/// Average mood must move more than this to get a label.
pub const MOOD_DELTA_THRESHOLD: f64 = 0.5;

/// Labeled direction of a significant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Improvement,
    Regression,
}

impl ChangeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Improvement => "improvement",
            ChangeDirection::Regression => "regression",
        }
    }
}

impl std::fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signed deltas between two weeks, current minus previous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyComparison {
    /// Completion rate change in percentage points
    pub completion_rate_delta: f64,
    /// Labeled only when the delta clears the threshold
    pub completion_change: Option<ChangeDirection>,
    /// Mood change; `None` unless both weeks had rated entries
    pub mood_delta: Option<f64>,
    pub mood_change: Option<ChangeDirection>,
    pub entry_count_delta: i64,
    pub longest_streak_delta: i64,
}

/// Diff two weeks of statistics.
pub fn compare(current: &WeeklyStatistics, previous: &WeeklyStatistics) -> WeeklyComparison {
    let completion_rate_delta = current.completion_rate - previous.completion_rate;
    let mood_delta = match (current.average_mood, previous.average_mood) {
        (Some(now), Some(then)) => Some(now - then),
        _ => None,
    };

    WeeklyComparison {
        completion_rate_delta,
        completion_change: direction(completion_rate_delta, COMPLETION_DELTA_THRESHOLD),
        mood_delta,
        mood_change: mood_delta.and_then(|d| direction(d, MOOD_DELTA_THRESHOLD)),
        entry_count_delta: current.entry_count as i64 - previous.entry_count as i64,
        longest_streak_delta: current.longest_streak as i64 - previous.longest_streak as i64,
    }
}

fn direction(delta: f64, threshold: f64) -> Option<ChangeDirection> {
    if delta > threshold {
        Some(ChangeDirection::Improvement)
    } else if delta < -threshold {
        Some(ChangeDirection::Regression)
    } else {
        None
    }
}

/// Next week's numbers if the current trend simply continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPrediction {
    /// Extrapolated completion rate, clamped to `[0, 100]`
    pub completion_rate: f64,
    /// Extrapolated average mood, clamped to the 1-10 rating scale
    pub average_mood: Option<f64>,
}

/// Linear extrapolation from two consecutive weeks.
///
/// `next = current + (current - previous)`, clamped to each metric's valid
/// range. When only the current week has mood data it is carried forward
/// unchanged.
pub fn predict(current: &WeeklyStatistics, previous: &WeeklyStatistics) -> WeeklyPrediction {
    let completion_rate =
        (2.0 * current.completion_rate - previous.completion_rate).clamp(0.0, 100.0);
    let average_mood = match (current.average_mood, previous.average_mood) {
        (Some(now), Some(then)) => Some((2.0 * now - then).clamp(1.0, 10.0)),
        (Some(now), None) => Some(now),
        _ => None,
    };
    WeeklyPrediction {
        completion_rate,
        average_mood,
    }
}
