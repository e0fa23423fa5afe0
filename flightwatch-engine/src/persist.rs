//! Persisted engine state.
//!
//! On save only the structured JSON form is written. On load two forms
//! coexist for backward compatibility: the structured form, and the legacy
//! packed-string form (one `partName:scope,data,0 ` record per line) written
//! by older releases. Malformed entries are skipped, never fatal.

use std::fs;
use std::path::Path;

use flightwatch_types::{PartHistory, SchemaVersion, VesselId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PersistError;

/// One persisted cache entry: a vessel and its first-seen timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownVesselEntry {
    pub vessel_id: VesselId,
    pub first_seen: f64,
}

/// Everything the engine persists across save/reload cycles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedState {
    /// Schema version the state was written with.
    pub version: SchemaVersion,

    /// Known vessels and their first-seen timestamps.
    pub vessels: Vec<KnownVesselEntry>,

    /// Per-part flight data histories.
    pub parts: Vec<PartHistory>,
}

impl SavedState {
    /// Empty state at the current schema version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the structured JSON form.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Encode into the structured JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse the legacy packed-string form: one record per line.
    ///
    /// Lines that decode are collected as part histories; the legacy form
    /// never carried vessel entries. Malformed lines are logged and skipped.
    pub fn from_packed_lines(s: &str) -> Self {
        let mut parts = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match PartHistory::from_packed(line) {
                Some(history) => parts.push(history),
                None => warn!(line, "discarding malformed packed history record"),
            }
        }
        Self {
            version: SchemaVersion::current(),
            vessels: Vec::new(),
            parts,
        }
    }

    /// Parse persisted state in whichever form it is in.
    ///
    /// Tries the structured form first and falls back to the legacy packed
    /// form. Never fails: unreadable content simply yields an empty state,
    /// matching the rest of the load path's skip-and-continue behavior.
    pub fn parse(s: &str) -> Self {
        match Self::from_json(s) {
            Ok(state) => state,
            Err(err) => {
                debug!(%err, "state is not structured JSON, trying legacy packed form");
                Self::from_packed_lines(s)
            }
        }
    }

    /// Load persisted state from a file, accepting both forms.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Write the structured form to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_state() -> SavedState {
        let mut history = PartHistory::new("engine");
        history.add_sample("space", 12.5);
        history.add_sample("atmosphere", 3.0);
        SavedState {
            version: SchemaVersion::current(),
            vessels: vec![KnownVesselEntry {
                vessel_id: Uuid::new_v4(),
                first_seen: 120.5,
            }],
            parts: vec![history],
        }
    }

    #[test]
    fn structured_round_trip() {
        let state = sample_state();
        let json = state.to_json().unwrap();
        let decoded = SavedState::from_json(&json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn parse_accepts_structured_form() {
        let state = sample_state();
        let decoded = SavedState::parse(&state.to_json().unwrap());
        assert_eq!(decoded, state);
    }

    #[test]
    fn parse_falls_back_to_packed_lines() {
        let decoded = SavedState::parse("engine:space,12.5,0 \ntank:atmosphere,3,0 \n");
        assert_eq!(decoded.parts.len(), 2);
        assert!(decoded.vessels.is_empty());
        assert_eq!(decoded.parts[0].data_for_scope("space"), Some(12.5));
    }

    #[test]
    fn packed_lines_skip_malformed_entries() {
        let decoded = SavedState::from_packed_lines("garbage line\nengine:space,1,0 \n\n");
        assert_eq!(decoded.parts.len(), 1);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flightwatch.json");

        let state = sample_state();
        state.save(&path).unwrap();
        let loaded = SavedState::load(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn load_reads_legacy_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flightdata.txt");
        std::fs::write(&path, "engine:space,5,0 \n").unwrap();

        let loaded = SavedState::load(&path).unwrap();
        assert_eq!(loaded.parts.len(), 1);
        assert_eq!(loaded.parts[0].part_name, "engine");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SavedState::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(PersistError::Io(_))));
    }

    #[test]
    fn missing_fields_default_on_load() {
        let decoded = SavedState::from_json("{}").unwrap();
        assert!(decoded.version.is_compatible());
        assert!(decoded.vessels.is_empty());
        assert!(decoded.parts.is_empty());
    }
}
