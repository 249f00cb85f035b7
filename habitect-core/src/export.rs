//! Export bundle ingest
//!
//! Storage belongs to the engine's collaborators; the engine only ever
//! sees in-memory slices. For offline analysis and the report CLI those
//! collaborators hand over a JSON export bundle with habits, events, and
//! journal entries in one document. This module parses that bundle and
//! flags referential oddities without failing on them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{Habit, HabitEvent, JournalEntry};

/// A full data handoff from the storage collaborator.
///
/// Every section is optional in the JSON; a bundle with only events is
/// fine. Events referencing habits the bundle does not carry still count
/// in event totals, they just cannot grow a streak.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportBundle {
    #[serde(default)]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub events: Vec<HabitEvent>,
    #[serde(default)]
    pub entries: Vec<JournalEntry>,
}

impl ExportBundle {
    /// Parse a bundle from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a bundle file, logging what came out of it.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading export bundle");
        let raw = fs::read_to_string(path)?;
        let bundle = Self::from_json(&raw)?;

        let orphans = bundle.orphaned_events();
        if orphans > 0 {
            warn!(orphans, "events reference habits missing from the bundle");
        }
        debug!(
            habits = bundle.habits.len(),
            events = bundle.events.len(),
            entries = bundle.entries.len(),
            "export bundle loaded"
        );
        Ok(bundle)
    }

    /// Distinct user ids present anywhere in the bundle, ascending.
    pub fn user_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .habits
            .iter()
            .map(|h| h.user_id)
            .chain(self.events.iter().map(|e| e.user_id))
            .chain(self.entries.iter().map(|e| e.user_id))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// The bundle's sole user, when there is exactly one.
    pub fn single_user(&self) -> Option<Uuid> {
        match self.user_ids().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Check that `user_id` appears somewhere in the bundle.
    ///
    /// A caller asking for a user the bundle knows nothing about is a
    /// client error, not an empty report.
    pub fn require_user(&self, user_id: Uuid) -> Result<Uuid> {
        if self.user_ids().contains(&user_id) {
            Ok(user_id)
        } else {
            Err(Error::UserNotFound(user_id))
        }
    }

    /// Events whose habit is not in the bundle.
    pub fn orphaned_events(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !self.habits.iter().any(|h| h.id == e.habit_id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "habits": [
            {
                "id": "6f7f26a8-3a95-4d0e-8c19-0ac6b05255d1",
                "user_id": "0b2f8a32-a07c-4d7b-a3d2-6a4a73c1a1aa",
                "title": "Morning run",
                "polarity": "build",
                "is_active": true
            }
        ],
        "events": [
            {
                "id": "0c9e5f0e-9d14-4c2c-a2f2-97ac21f994b1",
                "habit_id": "6f7f26a8-3a95-4d0e-8c19-0ac6b05255d1",
                "user_id": "0b2f8a32-a07c-4d7b-a3d2-6a4a73c1a1aa",
                "event_type": "completed",
                "occurred_at": "2024-06-10T07:30:00Z",
                "notes": null
            }
        ],
        "entries": [
            {
                "id": "f0b9a3de-52e0-4c9d-94ca-3bb0c2bb35b9",
                "user_id": "0b2f8a32-a07c-4d7b-a3d2-6a4a73c1a1aa",
                "created_at": "2024-06-10T21:00:00Z",
                "mood_rating": 8
            }
        ]
    }"#;

    #[test]
    fn test_parse_full_bundle() {
        let bundle = ExportBundle::from_json(BUNDLE).unwrap();
        assert_eq!(bundle.habits.len(), 1);
        assert_eq!(bundle.events.len(), 1);
        assert_eq!(bundle.entries.len(), 1);
        assert_eq!(bundle.habits[0].title, "Morning run");
        assert_eq!(bundle.entries[0].mood_rating, Some(8));
        assert_eq!(bundle.orphaned_events(), 0);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let bundle = ExportBundle::from_json(r#"{"habits": []}"#).unwrap();
        assert!(bundle.events.is_empty());
        assert!(bundle.entries.is_empty());
    }

    #[test]
    fn test_single_user_detection() {
        let bundle = ExportBundle::from_json(BUNDLE).unwrap();
        assert_eq!(
            bundle.single_user().map(|u| u.to_string()).as_deref(),
            Some("0b2f8a32-a07c-4d7b-a3d2-6a4a73c1a1aa")
        );
        assert_eq!(ExportBundle::default().single_user(), None);
    }

    #[test]
    fn test_require_user_rejects_unknown_ids() {
        let bundle = ExportBundle::from_json(BUNDLE).unwrap();
        let known: Uuid = "0b2f8a32-a07c-4d7b-a3d2-6a4a73c1a1aa".parse().unwrap();
        assert_eq!(bundle.require_user(known).unwrap(), known);

        let err = bundle.require_user(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[test]
    fn test_orphaned_events_are_counted_not_rejected() {
        let mut bundle = ExportBundle::from_json(BUNDLE).unwrap();
        bundle.habits.clear();
        assert_eq!(bundle.orphaned_events(), 1);
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        let err = ExportBundle::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(&path, BUNDLE).unwrap();
        let bundle = ExportBundle::load(&path).unwrap();
        assert_eq!(bundle.habits.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let err = ExportBundle::load(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
