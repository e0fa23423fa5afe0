//! Per-part flight data history and the packed-string codec.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// A single scoped flight-data record.
///
/// `scope` is a caller-defined bucket partitioning a part's accumulated
/// credit (for example a mission phase such as `"atmosphere"` or `"space"`).
/// Within one part's history, scopes are unique.
///
/// This type doubles as the live telemetry sample: a provider reports the
/// same triple it would be persisted as.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeRecord {
    /// Bucket name for this credit.
    pub scope: String,

    /// Accumulated flight data for the scope. Never regresses under merge.
    pub flight_data: f64,

    /// Continuous flight time of the current session, in seconds.
    ///
    /// Only meaningful for the current run: it resets to zero whenever a
    /// sample merges into the history, and is not persisted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub flight_time: f64,
}

impl ScopeRecord {
    /// Create a record with zero session time.
    pub fn new(scope: impl Into<String>, flight_data: f64) -> Self {
        Self {
            scope: scope.into(),
            flight_data,
            flight_time: 0.0,
        }
    }
}

/// Accumulated flight data for one part *type*, across all of its instances.
///
/// Histories are keyed by part name rather than instance identity: every
/// instance of the same part contributes to (and benefits from) the same
/// record. A history holds one [`ScopeRecord`] per scope.
///
/// # Merge rule
///
/// [`add_sample`](Self::add_sample) never lets a scope's credit regress: a
/// later sample reporting less than what is already stored is ignored.
/// Session time is reset on every merge, because only continuous
/// current-session time is meaningful for rate calculations elsewhere.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartHistory {
    /// Part type name this history belongs to.
    pub part_name: String,

    /// One record per scope, in first-seen order.
    pub records: Vec<ScopeRecord>,
}

impl PartHistory {
    /// Create an empty history for a part name.
    pub fn new(part_name: impl Into<String>) -> Self {
        Self {
            part_name: part_name.into(),
            records: Vec::new(),
        }
    }

    /// Fold a reported sample into the history.
    ///
    /// An existing record for `scope` keeps `max(existing, flight_data)` and
    /// has its session time reset to zero unconditionally. An unknown scope
    /// appends a fresh record.
    pub fn add_sample(&mut self, scope: &str, flight_data: f64) {
        match self.records.iter_mut().find(|r| r.scope == scope) {
            Some(record) => {
                if flight_data > record.flight_data {
                    record.flight_data = flight_data;
                }
                record.flight_time = 0.0;
            }
            None => self.records.push(ScopeRecord::new(scope, flight_data)),
        }
    }

    /// Look up the stored record for a scope.
    pub fn record_for_scope(&self, scope: &str) -> Option<&ScopeRecord> {
        self.records.iter().find(|r| r.scope == scope)
    }

    /// Accumulated flight data for a scope, if any has been recorded.
    pub fn data_for_scope(&self, scope: &str) -> Option<f64> {
        self.record_for_scope(scope).map(|r| r.flight_data)
    }

    /// Number of scopes with recorded data.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether any scope has recorded data.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Decode the legacy packed-string form.
    ///
    /// The format is `partName:scope,data,0 scope,data,0 ` - a colon after
    /// the part name, then space-separated comma triples. The third field is
    /// a historically reserved placeholder, accepted but ignored.
    ///
    /// Returns `None` if the string contains no colon (not a valid record).
    /// Empty tokens and tokens without exactly three comma fields are
    /// discarded; session time always decodes to zero.
    pub fn from_packed(s: &str) -> Option<Self> {
        let (part_name, rest) = s.split_once(':')?;
        let mut history = PartHistory::new(part_name);
        for token in rest.split(' ') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let fields: Vec<&str> = token.split(',').collect();
            if fields.len() != 3 {
                continue;
            }
            let Ok(flight_data) = fields[1].parse::<f64>() else {
                continue;
            };
            history.records.push(ScopeRecord::new(fields[0], flight_data));
        }
        Some(history)
    }

    /// Encode into the legacy packed-string form.
    ///
    /// Equivalent to `to_string()`; kept as a named method for symmetry with
    /// [`from_packed`](Self::from_packed).
    pub fn to_packed(&self) -> String {
        self.to_string()
    }
}

/// The packed-string form: `partName:scope,data,0 scope,data,0 `.
///
/// Every triple is followed by a space, the trailing one included; the third
/// field is always written as `0`.
impl fmt::Display for PartHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.part_name)?;
        for record in &self.records {
            write!(f, "{},{},0 ", record.scope, record.flight_data)?;
        }
        Ok(())
    }
}
