//! Mood statistics over journal entries
//!
//! Mean and population variance are computed over rated entries only, and
//! both are `None` rather than `NaN` when nothing was rated. The trend is
//! a halves comparison, not a slope regression: the week's ratings are
//! split chronologically, the first half takes `n / 2` entries and the
//! second half the remainder, and the means of the halves are compared
//! against a fixed threshold. Deliberately simple; a regression would read
//! more into four or five points than they contain.

use serde::{Deserialize, Serialize};

use crate::types::JournalEntry;

/// Half-to-half mean difference below which the week reads as stable.
pub const MOOD_TREND_THRESHOLD: f64 = 0.5;

/// Direction the week's mood moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    Improving,
    Stable,
    Declining,
}

impl MoodTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodTrend::Improving => "improving",
            MoodTrend::Stable => "stable",
            MoodTrend::Declining => "declining",
        }
    }
}

impl std::fmt::Display for MoodTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mood facts derived from a set of journal entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    /// All entries seen, rated or not
    pub entry_count: usize,
    /// Entries carrying a mood rating
    pub rated_count: usize,
    /// Mean rating over rated entries; `None` when nothing was rated
    pub average: Option<f64>,
    /// Population variance over rated entries; `None` when nothing was rated
    pub variance: Option<f64>,
    pub trend: MoodTrend,
}

/// Analyze mood over the supplied entries.
///
/// Entries are ordered by creation time before the trend split, so the
/// caller's ordering does not matter. Fewer than two ratings always read
/// as stable.
pub fn analyze_mood<'a, I>(entries: I) -> MoodAnalysis
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut ordered: Vec<&JournalEntry> = entries.into_iter().collect();
    ordered.sort_by_key(|e| e.created_at);

    let entry_count = ordered.len();
    let ratings: Vec<f64> = ordered
        .iter()
        .filter_map(|e| e.mood_rating)
        .map(f64::from)
        .collect();

    if ratings.is_empty() {
        return MoodAnalysis {
            entry_count,
            rated_count: 0,
            average: None,
            variance: None,
            trend: MoodTrend::Stable,
        };
    }

    let avg = mean(&ratings);
    let variance = ratings.iter().map(|r| (r - avg).powi(2)).sum::<f64>() / ratings.len() as f64;

    MoodAnalysis {
        entry_count,
        rated_count: ratings.len(),
        average: Some(avg),
        variance: Some(variance),
        trend: trend_of(&ratings),
    }
}

fn trend_of(ratings: &[f64]) -> MoodTrend {
    if ratings.len() < 2 {
        return MoodTrend::Stable;
    }
    let split = ratings.len() / 2;
    let delta = mean(&ratings[split..]) - mean(&ratings[..split]);
    if delta > MOOD_TREND_THRESHOLD {
        MoodTrend::Improving
    } else if delta < -MOOD_TREND_THRESHOLD {
        MoodTrend::Declining
    } else {
        MoodTrend::Stable
    }
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}
