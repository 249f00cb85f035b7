//! Calendar heatmap cells

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{civil_date, DateRange};
use crate::types::{HabitEvent, HabitEventType};

/// One calendar day's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// 0 (nothing logged) through 4 (near-perfect completion)
    pub intensity: u8,
    /// Completed events on this day
    pub contributing_events: usize,
}

/// One cell per day of `[start, end]`, inclusive of both endpoints.
///
/// Days with no events are present as explicit zero-intensity cells rather
/// than omitted, so the calendar view never has holes.
pub fn heatmap(events: &[HabitEvent], start: NaiveDate, end: NaiveDate, tz: Tz) -> Vec<HeatmapCell> {
    let range = DateRange::new(start, end);

    // (completed, total) per civil day
    let mut per_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for event in events {
        let date = civil_date(event.occurred_at, tz);
        if !range.contains(date) {
            continue;
        }
        let slot = per_day.entry(date).or_insert((0, 0));
        slot.1 += 1;
        if event.event_type == HabitEventType::Completed {
            slot.0 += 1;
        }
    }

    range
        .iter()
        .map(|date| {
            let (completed, total) = per_day.get(&date).copied().unwrap_or((0, 0));
            HeatmapCell {
                date,
                intensity: intensity_for(completed, total),
                contributing_events: completed,
            }
        })
        .collect()
}

/// Bucket a day's completion ratio into five intensity levels.
fn intensity_for(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = completed as f64 / total as f64;
    if ratio >= 0.8 {
        4
    } else if ratio >= 0.6 {
        3
    } else if ratio >= 0.4 {
        2
    } else {
        1
    }
}
