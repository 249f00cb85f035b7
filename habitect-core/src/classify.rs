//! Event classification
//!
//! Decides whether a logged event keeps a streak alive, and folds a habit's
//! raw event stream into at most one significant event per civil day.
//!
//! Contribution is polarity-dependent:
//! - `build`: only `completed` contributes; a skip or anything else breaks
//! - `avoid`: every recorded event except `relapsed` contributes, because
//!   for an avoid habit staying away is the success condition
//!
//! The per-day fold applies the first-seen-wins rule: the earliest event of
//! the day marks it, and a later event replaces the mark only when that
//! later event is contributing. Upstream logging intends one event per
//! habit per day; the fold makes the engine deterministic when that
//! intention is violated rather than trusting it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::calendar::civil_date;
use crate::types::{HabitEvent, HabitEventType, HabitPolarity};

// ============================================
// Contribution rule
// ============================================

/// Whether an event of `event_type` contributes to a streak for a habit of
/// `polarity`. Pure and total; there are no error cases.
pub fn contributes(polarity: HabitPolarity, event_type: HabitEventType) -> bool {
    match polarity {
        HabitPolarity::Build => event_type == HabitEventType::Completed,
        HabitPolarity::Avoid => event_type != HabitEventType::Relapsed,
    }
}

// ============================================
// Per-day folding
// ============================================

/// A civil day's folded disposition: the significant event and whether it
/// contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    /// The day's significant event type
    pub event_type: HabitEventType,
    /// Whether the day counts toward streak continuity
    pub contributes: bool,
}

/// Fold a habit's events into one significant event per civil day.
///
/// Events are ordered by instant (ties broken by id) before folding so the
/// result does not depend on the order the caller supplied them in.
/// Returns an ascending date map; days without events are simply absent.
pub fn fold_daily<'a, I>(events: I, polarity: HabitPolarity, tz: Tz) -> BTreeMap<NaiveDate, DayRecord>
where
    I: IntoIterator<Item = &'a HabitEvent>,
{
    let mut ordered: Vec<&HabitEvent> = events.into_iter().collect();
    ordered.sort_by(|a, b| {
        a.occurred_at
            .cmp(&b.occurred_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut days: BTreeMap<NaiveDate, DayRecord> = BTreeMap::new();
    for event in ordered {
        let date = civil_date(event.occurred_at, tz);
        let record = DayRecord {
            event_type: event.event_type,
            contributes: contributes(polarity, event.event_type),
        };
        match days.get(&date) {
            // first event of the day marks it
            None => {
                days.insert(date, record);
            }
            // a marked day is only overwritten by a contributing event
            Some(_) if record.contributes => {
                days.insert(date, record);
            }
            Some(_) => {}
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn event(event_type: HabitEventType, at: &str) -> HabitEvent {
        HabitEvent {
            id: Uuid::new_v4(),
            habit_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_type,
            occurred_at: DateTime::parse_from_rfc3339(at)
                .unwrap()
                .with_timezone(&Utc),
            notes: None,
        }
    }

    #[test]
    fn test_build_polarity_only_completed_contributes() {
        assert!(contributes(HabitPolarity::Build, HabitEventType::Completed));
        assert!(!contributes(HabitPolarity::Build, HabitEventType::Skipped));
        assert!(!contributes(HabitPolarity::Build, HabitEventType::Relapsed));
    }

    #[test]
    fn test_avoid_polarity_everything_but_relapse_contributes() {
        assert!(contributes(HabitPolarity::Avoid, HabitEventType::Completed));
        assert!(contributes(HabitPolarity::Avoid, HabitEventType::Skipped));
        assert!(!contributes(HabitPolarity::Avoid, HabitEventType::Relapsed));
    }

    #[test]
    fn test_fold_groups_by_civil_date() {
        let events = vec![
            event(HabitEventType::Completed, "2024-06-10T08:00:00Z"),
            event(HabitEventType::Completed, "2024-06-11T21:30:00Z"),
        ];
        let days = fold_daily(&events, HabitPolarity::Build, Tz::UTC);
        assert_eq!(days.len(), 2);
        let d = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(
            days[&d],
            DayRecord {
                event_type: HabitEventType::Completed,
                contributes: true,
            }
        );
    }

    #[test]
    fn test_fold_contributing_event_overwrites_earlier_mark() {
        // skip logged in the morning, completion in the evening: the
        // contributing completion wins the day
        let events = vec![
            event(HabitEventType::Skipped, "2024-06-10T08:00:00Z"),
            event(HabitEventType::Completed, "2024-06-10T20:00:00Z"),
        ];
        let days = fold_daily(&events, HabitPolarity::Build, Tz::UTC);
        let d = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(days[&d].event_type, HabitEventType::Completed);
        assert!(days[&d].contributes);
    }

    #[test]
    fn test_fold_non_contributing_event_never_overwrites() {
        let events = vec![
            event(HabitEventType::Completed, "2024-06-10T08:00:00Z"),
            event(HabitEventType::Skipped, "2024-06-10T20:00:00Z"),
        ];
        let days = fold_daily(&events, HabitPolarity::Build, Tz::UTC);
        let d = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(days[&d].event_type, HabitEventType::Completed);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let a = event(HabitEventType::Skipped, "2024-06-10T08:00:00Z");
        let b = event(HabitEventType::Completed, "2024-06-10T20:00:00Z");
        let forward = fold_daily(&[a.clone(), b.clone()], HabitPolarity::Build, Tz::UTC);
        let reversed = fold_daily(&[b, a], HabitPolarity::Build, Tz::UTC);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_fold_uses_the_timezone_for_day_boundaries() {
        // 02:30 UTC is still the previous evening in New York
        let events = vec![event(HabitEventType::Completed, "2024-06-11T02:30:00Z")];
        let ny: Tz = "America/New_York".parse().unwrap();
        let days = fold_daily(&events, HabitPolarity::Build, ny);
        assert!(days.contains_key(&NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()));
    }
}
