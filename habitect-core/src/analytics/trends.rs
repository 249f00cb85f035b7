//! Time-bucketed completion trends

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::analytics::percentage;
use crate::calendar::{civil_date, week_start_sunday, DateRange};
use crate::types::{HabitEvent, HabitEventType};

// ============================================
// Grouping
// ============================================

/// Granularity of trend buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Day,
    Week,
    Month,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" | "Day" | "daily" => Ok(GroupBy::Day),
            "week" | "Week" | "weekly" => Ok(GroupBy::Week),
            "month" | "Month" | "monthly" => Ok(GroupBy::Month),
            _ => Err(format!("unknown grouping: {}", s)),
        }
    }
}

/// Sort and display key of one trend bucket.
///
/// Week buckets key on the civil date of the week's Sunday; month buckets
/// render as `YYYY-MM`. Ordering is chronological within one grouping,
/// which is the only way buckets are ever compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PeriodKey {
    Day(NaiveDate),
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(d) | PeriodKey::Week(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PeriodKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn period_key(group_by: GroupBy, date: NaiveDate) -> PeriodKey {
    match group_by {
        GroupBy::Day => PeriodKey::Day(date),
        GroupBy::Week => PeriodKey::Week(week_start_sunday(date)),
        GroupBy::Month => PeriodKey::Month {
            year: date.year(),
            month: date.month(),
        },
    }
}

// ============================================
// Buckets
// ============================================

/// One habit's share of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitSlice {
    pub completed: usize,
    pub total: usize,
    pub completion_rate: f64,
}

/// Counts for one period, with a per-habit breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub period: PeriodKey,
    pub completed: usize,
    pub skipped: usize,
    pub relapsed: usize,
    pub total: usize,
    pub completion_rate: f64,
    pub per_habit: BTreeMap<Uuid, HabitSlice>,
}

#[derive(Default)]
struct Acc {
    completed: usize,
    skipped: usize,
    relapsed: usize,
    total: usize,
    per_habit: BTreeMap<Uuid, (usize, usize)>,
}

/// Bucket the events falling inside `[start, end]` by period, ascending.
///
/// Only periods with at least one event are emitted; the heatmap is the
/// view that guarantees calendar completeness.
pub fn completion_trends(
    events: &[HabitEvent],
    start: NaiveDate,
    end: NaiveDate,
    group_by: GroupBy,
    tz: Tz,
) -> Vec<TrendBucket> {
    let range = DateRange::new(start, end);
    let mut buckets: BTreeMap<PeriodKey, Acc> = BTreeMap::new();

    for event in events {
        let date = civil_date(event.occurred_at, tz);
        if !range.contains(date) {
            continue;
        }
        let acc = buckets.entry(period_key(group_by, date)).or_default();
        acc.total += 1;
        match event.event_type {
            HabitEventType::Completed => acc.completed += 1,
            HabitEventType::Skipped => acc.skipped += 1,
            HabitEventType::Relapsed => acc.relapsed += 1,
        }
        let slice = acc.per_habit.entry(event.habit_id).or_insert((0, 0));
        slice.1 += 1;
        if event.event_type == HabitEventType::Completed {
            slice.0 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(period, acc)| TrendBucket {
            period,
            completed: acc.completed,
            skipped: acc.skipped,
            relapsed: acc.relapsed,
            total: acc.total,
            completion_rate: percentage(acc.completed, acc.total),
            per_habit: acc
                .per_habit
                .into_iter()
                .map(|(habit_id, (completed, total))| {
                    (
                        habit_id,
                        HabitSlice {
                            completed,
                            total,
                            completion_rate: percentage(completed, total),
                        },
                    )
                })
                .collect(),
        })
        .collect()
}
