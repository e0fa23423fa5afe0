//! Read-only boundary to the host simulation.
//!
//! The simulation owns its vessels and parts; the engine only observes
//! identity, category, and the telemetry capability. Both the vessel set
//! and each part's capability are resolved fresh on every pass - nothing
//! from these traits is cached across ticks.

use flightwatch_types::{PartId, VesselClass, VesselId};

use crate::telemetry::Telemetry;

/// The host simulation as seen by the engine.
pub trait World {
    /// Current simulation (universal) time, in seconds.
    fn now(&self) -> f64;

    /// Identities of every vessel currently alive in the simulation.
    fn vessel_ids(&self) -> Vec<VesselId>;

    /// The currently active/focused vessel, if any.
    fn active_vessel(&self) -> Option<VesselId>;

    /// Look up a live vessel by identity.
    fn vessel(&self, id: VesselId) -> Option<&dyn Vessel>;

    /// Look up a live vessel for telemetry calls that mutate provider state.
    fn vessel_mut(&mut self, id: VesselId) -> Option<&mut dyn Vessel>;
}

/// One live vessel.
pub trait Vessel {
    fn id(&self) -> VesselId;

    /// Display name.
    fn name(&self) -> &str;

    /// Current classification; may change over a vessel's lifetime
    /// (a decoupled stage becomes debris).
    fn class(&self) -> VesselClass;

    /// Identities of the vessel's current parts.
    fn part_ids(&self) -> Vec<PartId>;

    /// Look up a part by identity.
    fn part(&self, id: PartId) -> Option<&dyn Part>;

    /// Look up a part for telemetry calls that mutate provider state.
    fn part_mut(&mut self, id: PartId) -> Option<&mut dyn Part>;
}

/// One live part on a vessel.
pub trait Part {
    fn id(&self) -> PartId;

    /// Part *type* name; keys the shared flight-data history.
    fn name(&self) -> &str;

    /// Display title shown in status output.
    fn title(&self) -> &str;

    /// The part's telemetry capability, if it currently exposes one.
    /// Zero-or-one implementor per part.
    fn telemetry(&self) -> Option<&dyn Telemetry>;

    /// Mutable access to the telemetry capability.
    fn telemetry_mut(&mut self) -> Option<&mut dyn Telemetry>;
}
