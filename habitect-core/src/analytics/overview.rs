//! Portfolio-level counts across all of a user's habits

use serde::{Deserialize, Serialize};

use crate::analytics::percentage;
use crate::types::{Habit, HabitEvent, HabitEventType};

/// Headline counts over a user's habits and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_habits: usize,
    pub active_habits: usize,
    pub total_events: usize,
    pub completed_events: usize,
    /// Completed share of all events, as a percentage
    pub overall_completion_rate: f64,
}

/// Simple counts over the supplied slices.
///
/// Events are not filtered by habit: the caller decides the population by
/// what it passes in. Empty inputs produce an all-zero overview.
pub fn overview(habits: &[Habit], events: &[HabitEvent]) -> Overview {
    let completed = events
        .iter()
        .filter(|e| e.event_type == HabitEventType::Completed)
        .count();

    Overview {
        total_habits: habits.len(),
        active_habits: habits.iter().filter(|h| h.is_active).count(),
        total_events: events.len(),
        completed_events: completed,
        overall_completion_rate: percentage(completed, events.len()),
    }
}
