//! Live status types: per-part status entries grouped by vessel.

use alloc::string::String;
use alloc::vec::Vec;

use uuid::Uuid;

/// Unique identity of a tracked vessel, assigned by the host simulation.
pub type VesselId = Uuid;

/// Per-instance part identifier, assigned by the host simulation. Unlike the
/// part *name*, this distinguishes two instances of the same part type.
pub type PartId = u32;

/// Category of a top-level vessel, as classified by the host simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum VesselClass {
    Ship,
    Probe,
    Lander,
    Rover,
    Station,
    Base,
    Debris,
    Unknown,
}

impl VesselClass {
    /// Whether vessels of this class are eligible for tracking.
    ///
    /// Debris is never tracked; bases and unclassified vessels are skipped
    /// by the default filter as well.
    pub fn is_trackable(&self) -> bool {
        matches!(
            self,
            VesselClass::Ship
                | VesselClass::Probe
                | VesselClass::Lander
                | VesselClass::Rover
                | VesselClass::Station
        )
    }
}

/// Severity of an active failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FailureSeverity {
    Minor,
    Major,
}

/// Descriptor of a failure currently affecting a part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailureInfo {
    /// Human-readable failure title, e.g. `"Fuel line leak"`.
    pub title: String,
    /// How badly the failure degrades the part.
    pub severity: FailureSeverity,
}

impl FailureInfo {
    pub fn new(title: impl Into<String>, severity: FailureSeverity) -> Self {
        Self {
            title: title.into(),
            severity,
        }
    }
}

/// Point-in-time status of a single part instance.
///
/// Rebuilt on every data poll from the part's telemetry provider; not
/// persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartStatus {
    /// Instance identity within the vessel.
    pub part_id: PartId,

    /// Display name of the part.
    pub part_name: String,

    /// Accumulated flight data reported for the provider's current scope.
    pub flight_data: f64,

    /// Continuous flight time of the current session, in seconds.
    pub flight_time: f64,

    /// 0 = nominal, >0 = degraded or failed.
    pub status_code: i32,

    /// Current reliability, on a 0-100 scale.
    pub reliability: f64,

    /// The failure currently affecting the part, when `status_code > 0`.
    pub active_failure: Option<FailureInfo>,

    /// Whether the part is currently highlighted for display.
    pub highlighted: bool,

    /// Tooltip describing what a repair would require.
    pub repair_requirements: String,
}

impl PartStatus {
    /// Whether the part currently reports a non-nominal status.
    pub fn is_failed(&self) -> bool {
        self.status_code > 0
    }
}

/// Status of every tracked part on one vessel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VesselStatus {
    /// Identity of the vessel in the host simulation.
    pub vessel_id: VesselId,

    /// Display name, captured when the vessel was first tracked.
    pub vessel_name: String,

    /// One entry per part with a telemetry provider, in first-polled order.
    pub parts: Vec<PartStatus>,
}

impl VesselStatus {
    /// Create an empty status group for a vessel.
    pub fn new(vessel_id: VesselId, vessel_name: impl Into<String>) -> Self {
        Self {
            vessel_id,
            vessel_name: vessel_name.into(),
            parts: Vec::new(),
        }
    }

    /// Look up the status entry for a part instance.
    pub fn part(&self, part_id: PartId) -> Option<&PartStatus> {
        self.parts.iter().find(|p| p.part_id == part_id)
    }

    /// Number of parts with a status entry.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check whether any part has a status entry.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether any part on the vessel reports a failure.
    pub fn has_failures(&self) -> bool {
        self.parts.iter().any(|p| p.is_failed())
    }
}
