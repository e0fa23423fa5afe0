//! Durable per-part flight data history.

use std::collections::BTreeMap;

use flightwatch_types::PartHistory;
use tracing::warn;

/// Owns every part's accumulated flight data, keyed by part name.
///
/// Histories are durable: they survive vessels, scene changes, and
/// save/reload cycles, because the same part type keeps earning credit no
/// matter which vessel it flies on. Merging goes through
/// [`PartHistory::add_sample`], so credit never regresses.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    parts: BTreeMap<String, PartHistory>,
}

impl HistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one reported sample into the history for `part_name`,
    /// creating the history lazily on first sight of the name.
    pub fn record_sample(&mut self, part_name: &str, scope: &str, flight_data: f64) {
        self.parts
            .entry(part_name.to_string())
            .or_insert_with(|| PartHistory::new(part_name))
            .add_sample(scope, flight_data);
    }

    /// Look up the history for a part name.
    pub fn history_for(&self, part_name: &str) -> Option<&PartHistory> {
        self.parts.get(part_name)
    }

    /// Merge a whole history into the store, record by record.
    ///
    /// Used when restoring persisted state; an already-present part name
    /// keeps the max of both sides per scope.
    pub fn insert(&mut self, history: PartHistory) {
        match self.parts.get_mut(&history.part_name) {
            Some(existing) => {
                for record in &history.records {
                    existing.add_sample(&record.scope, record.flight_data);
                }
            }
            None => {
                self.parts.insert(history.part_name.clone(), history);
            }
        }
    }

    /// Load legacy packed-string records, one per line.
    ///
    /// Malformed lines are logged and skipped; loading never aborts.
    /// Returns the number of histories merged in.
    pub fn load_packed<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> usize {
        let mut loaded = 0;
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            match PartHistory::from_packed(line) {
                Some(history) => {
                    self.insert(history);
                    loaded += 1;
                }
                None => warn!(line, "discarding malformed packed history record"),
            }
        }
        loaded
    }

    /// Iterate over all histories in part-name order.
    pub fn iter(&self) -> impl Iterator<Item = &PartHistory> {
        self.parts.values()
    }

    /// Number of part names with history.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check whether any part has history.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
