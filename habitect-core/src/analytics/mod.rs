//! Analytics aggregator
//!
//! Pure reductions over a bounded event slice: overview counts, per-habit
//! completion and consistency metrics, calendar heatmaps, and time-bucketed
//! completion trends. No function here scans storage; the caller supplies
//! the slice and the aggregates stay trivially testable with literal
//! fixtures.
//!
//! All rates are percentages in `[0, 100]`. Division is zero-safe
//! everywhere: an empty denominator yields `0.0`, never `NaN`.

pub mod habit;
pub mod heatmap;
pub mod overview;
pub mod trends;

pub use habit::{per_habit_analytics, HabitAnalytics};
pub use heatmap::{heatmap, HeatmapCell};
pub use overview::{overview, Overview};
pub use trends::{completion_trends, GroupBy, HabitSlice, PeriodKey, TrendBucket};

/// Zero-safe percentage. `0.0` when `whole` is zero, never `NaN`.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_is_zero_safe() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(3, 3), 100.0);
    }
}
