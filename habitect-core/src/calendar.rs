//! Calendar normalization
//!
//! Every computation in the engine is keyed on civil dates, never on raw
//! instants. Events and journal entries arrive with UTC instants; this
//! module converts them to the calendar date they fall on in the user's
//! timezone, so that "did something happen today" means the user's today.
//!
//! Timezone lookups go through the IANA database via `chrono-tz`. An
//! invalid identifier degrades to UTC instead of failing the computation:
//! the substitution is logged and flagged so callers can surface it.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ============================================
// Timezone resolution
// ============================================

/// Outcome of resolving a user's timezone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneResolution {
    /// The timezone computations will run in
    pub tz: Tz,
    /// True when the identifier was unknown and UTC was substituted
    pub degraded: bool,
}

/// Resolve an IANA timezone identifier, falling back to UTC.
///
/// An unknown identifier never fails a computation. The resolution degrades
/// to UTC, the substitution is logged, and `degraded` is set so derived
/// payloads can carry the fallback instead of hiding it.
pub fn resolve_timezone(tz_str: &str) -> ZoneResolution {
    match tz_str.parse::<Tz>() {
        Ok(tz) => ZoneResolution { tz, degraded: false },
        Err(_) => {
            warn!(timezone = %tz_str, "unknown IANA timezone, computing in UTC");
            ZoneResolution {
                tz: Tz::UTC,
                degraded: true,
            }
        }
    }
}

// ============================================
// Civil dates
// ============================================

/// The civil date `instant` falls on in `tz`.
///
/// DST transitions come from the timezone database, so two instants less
/// than an hour apart can land on different civil dates around a spring
/// forward. That is the correct behavior for day-keyed streak math.
pub fn civil_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's civil date in `tz`.
///
/// Engine entry points take `today` as a parameter so results stay
/// deterministic; this is the convenience callers use to supply it.
pub fn civil_today(tz: Tz) -> NaiveDate {
    civil_date(Utc::now(), tz)
}

/// The Sunday on or before `date`.
///
/// Weeks are Sunday-anchored everywhere in the engine: weekly statistics
/// windows, weekly trend buckets, and comparison periods all key on the
/// Sunday that starts the week.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    date - Duration::days(back)
}

// ============================================
// Date ranges
// ============================================

/// An inclusive range of civil dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First covered date
    pub start: NaiveDate,
    /// Last covered date, inclusive
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the endpoints if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            DateRange { start, end }
        } else {
            DateRange {
                start: end,
                end: start,
            }
        }
    }

    /// The trailing window of `days` days ending at `end` inclusive.
    ///
    /// `days` must be at least 1; a 1-day window is just `end` itself.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        DateRange {
            start: end - Duration::days(days as i64 - 1),
            end,
        }
    }

    /// Number of days covered, counting both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterate the covered dates in ascending order.
    pub fn iter(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }
}
