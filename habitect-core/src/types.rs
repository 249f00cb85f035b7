//! Core domain types for habitect
//!
//! These types are the canonical model the engine computes over. The engine
//! never creates or mutates habits, events, or journal entries; it consumes
//! slices of them supplied by the calling layer and produces derived values
//! (streaks, analytics buckets, weekly statistics) that are safe to cache
//! until the next event write for the same habit or user.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | Something a user tracks daily, either to build or to avoid |
//! | **Polarity** | Whether a habit is `build` or `avoid`; decides which events keep a streak alive |
//! | **Event** | A single logged fact against a habit (`completed`, `skipped`, `relapsed`) |
//! | **Civil date** | The calendar date an instant falls on in the user's timezone |
//! | **Contributing day** | A civil day whose disposition counts toward streak continuity |
//! | **Journal entry** | A dated entry with an optional 1-10 mood rating |
//!
//! Mood prose never enters the engine: journal entries are reduced to
//! `{created_at, mood_rating}` because phrasing belongs to the AI summary
//! collaborator, not to streak and analytics math.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================
// Habits
// ============================================

/// Whether a habit is something to build or something to avoid.
///
/// Polarity decides which event types contribute to a streak (see
/// [`crate::classify`]). It is treated as immutable once events exist for
/// the habit: flipping it would silently reinterpret the recorded history,
/// so that operation is unsupported rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitPolarity {
    /// A positive habit: success must be logged to count
    Build,
    /// A negative habit: staying away is success, relapsing breaks it
    Avoid,
}

impl HabitPolarity {
    /// Returns the identifier used in serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitPolarity::Build => "build",
            HabitPolarity::Avoid => "avoid",
        }
    }
}

impl std::fmt::Display for HabitPolarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HabitPolarity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "build" | "BUILD" | "Build" => Ok(HabitPolarity::Build),
            "avoid" | "AVOID" | "Avoid" => Ok(HabitPolarity::Avoid),
            _ => Err(format!("unknown habit polarity: {}", s)),
        }
    }
}

/// A habit a user tracks day by day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Human-friendly title ("Morning run", "No doomscrolling")
    pub title: String,
    /// Build or avoid semantics; immutable once events exist
    pub polarity: HabitPolarity,
    /// Whether the habit currently counts toward active-habit aggregates
    pub is_active: bool,
}

// ============================================
// Events
// ============================================

/// What a user recorded against a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitEventType {
    /// The habit was done
    Completed,
    /// The habit was explicitly not done today
    Skipped,
    /// The user broke an avoid habit
    Relapsed,
}

impl HabitEventType {
    /// Returns the identifier used in serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitEventType::Completed => "completed",
            HabitEventType::Skipped => "skipped",
            HabitEventType::Relapsed => "relapsed",
        }
    }
}

impl std::fmt::Display for HabitEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HabitEventType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "completed" | "COMPLETED" | "Completed" => Ok(HabitEventType::Completed),
            "skipped" | "SKIPPED" | "Skipped" => Ok(HabitEventType::Skipped),
            "relapsed" | "RELAPSED" | "Relapsed" => Ok(HabitEventType::Relapsed),
            _ => Err(format!("unknown event type: {}", s)),
        }
    }
}

/// A single logged habit event.
///
/// Events are immutable facts once logged. The engine only reads them; it
/// keys every computation on the civil date `occurred_at` falls on in the
/// user's timezone, never on the raw instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitEvent {
    /// Unique identifier
    pub id: Uuid,
    /// Habit this event was logged against
    pub habit_id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// What was recorded
    pub event_type: HabitEventType,
    /// When the event happened (instant; civil date is derived per-user)
    pub occurred_at: DateTime<Utc>,
    /// Optional note the user attached; opaque to the engine
    pub notes: Option<String>,
}

// ============================================
// Journal
// ============================================

/// A journal entry reduced to the facts the engine consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// Mood rating on a 1-10 scale, if the user rated the entry
    pub mood_rating: Option<u8>,
}

impl JournalEntry {
    /// Whether this entry carries a mood rating.
    ///
    /// Mood statistics (mean, variance, trend) are computed over rated
    /// entries only; unrated entries still count toward entry totals.
    pub fn is_rated(&self) -> bool {
        self.mood_rating.is_some()
    }
}

// ============================================
// Streaks (derived)
// ============================================

/// Classification of a habit's streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakType {
    /// The streak is alive
    Current,
    /// The streak was lost (missed days, or a relapse at the walk head)
    Broken,
    /// No streak yet: no events at all, or history without a live run
    New,
}

impl StreakType {
    /// Returns the identifier used in serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakType::Current => "current",
            StreakType::Broken => "broken",
            StreakType::New => "new",
        }
    }
}

impl std::str::FromStr for StreakType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "current" => Ok(StreakType::Current),
            "broken" => Ok(StreakType::Broken),
            "new" => Ok(StreakType::New),
            _ => Err(format!("unknown streak type: {}", s)),
        }
    }
}

/// Derived streak state for one habit.
///
/// Recomputed on demand from the habit's event history; never persisted as
/// a source of truth. Any cached copy is valid only until the next event
/// write for the same habit. `current_streak <= longest_streak` always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Habit this streak belongs to
    pub habit_id: Uuid,
    /// Length of the run that is still alive today, in days
    pub current_streak: u32,
    /// Longest run ever recorded, in days
    pub longest_streak: u32,
    /// Civil date of the most recent significant event, if any
    pub last_event_date: Option<NaiveDate>,
    /// Streak classification
    pub streak_type: StreakType,
}

/// One day in a habit's calendar history.
///
/// Histories are total and gap-free: every day in the requested window gets
/// a record, including days with no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDay {
    /// The civil date
    pub date: NaiveDate,
    /// Whether any event was logged on this day
    pub has_event: bool,
    /// The day's significant event type, if any
    pub event_type: Option<HabitEventType>,
    /// Whether this day counts toward streak continuity
    pub contributes: bool,
}

// ============================================
// Lookup helpers
// ============================================

/// Find a habit by id among a caller-supplied slice, scoped to a user.
///
/// A habit owned by a different user is reported as not found rather than
/// leaking its existence. This is the engine's `NotFound` boundary; callers
/// map it to their transport's client-error shape.
pub fn find_habit(habits: &[Habit], user_id: Uuid, habit_id: Uuid) -> Result<&Habit> {
    habits
        .iter()
        .find(|h| h.id == habit_id && h.user_id == user_id)
        .ok_or(Error::HabitNotFound(habit_id))
}
