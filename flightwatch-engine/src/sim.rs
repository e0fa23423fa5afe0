//! In-memory simulation harness.
//!
//! A small, fully scriptable [`World`] implementation used by the examples
//! and the engine's own tests: vessels and parts are plain structs, and
//! [`LinearTelemetry`] accumulates flight data at a fixed rate with an
//! optional scripted failure. Real hosts implement the [`crate::world`]
//! traits against their own object graph instead.

use flightwatch_types::{FailureInfo, PartId, ScopeRecord, VesselClass, VesselId};
use uuid::Uuid;

use crate::telemetry::Telemetry;
use crate::world::{Part, Vessel, World};

/// Telemetry provider that earns flight data linearly with elapsed time.
///
/// `flight_data` grows by `rate * dt * multipliers` on every advance;
/// `flight_time` tracks continuous time since the vessel's first-seen
/// timestamp. A failure can be scripted to trigger after a fixed amount of
/// mission time, on the next failure check.
#[derive(Debug, Clone)]
pub struct LinearTelemetry {
    pub scope: String,
    pub rate: f64,
    pub base_reliability: f64,
    pub flight_data: f64,
    pub flight_time: f64,
    pub status_code: i32,
    pub active_failure: Option<FailureInfo>,
    pub highlighted: bool,
    pub repair_requirements: String,

    /// Scripted failure: trigger after this much mission time.
    pub fail_after: Option<(f64, FailureInfo)>,

    /// Number of `advance` calls, for poll-gating assertions.
    pub advances: u32,
    /// Number of `failure_check` calls.
    pub failure_checks: u32,
    /// Number of `initialize_history` calls.
    pub initializations: u32,

    last_advance: Option<f64>,
}

impl LinearTelemetry {
    /// Create a provider reporting under `scope`, earning `rate` data per
    /// second of flight.
    pub fn new(scope: impl Into<String>, rate: f64) -> Self {
        Self {
            scope: scope.into(),
            rate,
            base_reliability: 100.0,
            flight_data: 0.0,
            flight_time: 0.0,
            status_code: 0,
            active_failure: None,
            highlighted: false,
            repair_requirements: String::new(),
            fail_after: None,
            advances: 0,
            failure_checks: 0,
            initializations: 0,
            last_advance: None,
        }
    }

    /// Script a failure to trigger once `after` seconds of mission time have
    /// elapsed, on the next failure check.
    pub fn failing_after(mut self, after: f64, failure: FailureInfo) -> Self {
        self.fail_after = Some((after, failure));
        self
    }

    /// Override the base reliability (0-100).
    pub fn with_reliability(mut self, reliability: f64) -> Self {
        self.base_reliability = reliability;
        self
    }
}

impl Telemetry for LinearTelemetry {
    fn initialize_history(&mut self, prior: &[ScopeRecord], _reliability_modifier: f64) {
        self.initializations += 1;
        if let Some(record) = prior.iter().find(|r| r.scope == self.scope) {
            if record.flight_data > self.flight_data {
                self.flight_data = record.flight_data;
            }
        }
    }

    fn advance(
        &mut self,
        now: f64,
        first_seen: f64,
        data_multiplier: f64,
        engineer_multiplier: f64,
        _reliability_modifier: f64,
    ) {
        self.advances += 1;
        let last = self.last_advance.unwrap_or(first_seen);
        let dt = (now - last).max(0.0);
        self.flight_data += dt * self.rate * data_multiplier * engineer_multiplier;
        self.flight_time = (now - first_seen).max(0.0);
        self.last_advance = Some(now);
    }

    fn current_sample(&self) -> ScopeRecord {
        ScopeRecord {
            scope: self.scope.clone(),
            flight_data: self.flight_data,
            flight_time: self.flight_time,
        }
    }

    fn status_code(&self) -> i32 {
        self.status_code
    }

    fn reliability(&self, reliability_modifier: f64) -> f64 {
        (self.base_reliability * reliability_modifier).clamp(0.0, 100.0)
    }

    fn active_failure(&self) -> Option<FailureInfo> {
        self.active_failure.clone()
    }

    fn requirements_tooltip(&self) -> String {
        self.repair_requirements.clone()
    }

    fn failure_check(&mut self, now: f64, first_seen: f64, _reliability_modifier: f64) {
        self.failure_checks += 1;
        if self.active_failure.is_some() {
            return;
        }
        if let Some((after, failure)) = &self.fail_after {
            if now - first_seen >= *after {
                self.active_failure = Some(failure.clone());
                self.status_code = 1;
            }
        }
    }

    fn attempt_repair(&mut self) -> bool {
        if self.active_failure.take().is_some() {
            self.status_code = 0;
            true
        } else {
            false
        }
    }

    fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }
}

/// One scripted part.
#[derive(Debug, Clone)]
pub struct SimPart {
    pub id: PartId,
    pub name: String,
    pub title: String,
    pub telemetry: Option<LinearTelemetry>,
}

impl SimPart {
    /// A part without the telemetry capability (structural part).
    pub fn inert(id: PartId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            title: name.clone(),
            name,
            telemetry: None,
        }
    }

    /// A part exposing the given telemetry provider.
    pub fn new(id: PartId, name: impl Into<String>, telemetry: LinearTelemetry) -> Self {
        let name = name.into();
        Self {
            id,
            title: name.clone(),
            name,
            telemetry: Some(telemetry),
        }
    }

    /// Override the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Part for SimPart {
    fn id(&self) -> PartId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn telemetry(&self) -> Option<&dyn Telemetry> {
        self.telemetry.as_ref().map(|t| t as &dyn Telemetry)
    }

    fn telemetry_mut(&mut self) -> Option<&mut dyn Telemetry> {
        self.telemetry.as_mut().map(|t| t as &mut dyn Telemetry)
    }
}

/// One scripted vessel.
#[derive(Debug, Clone)]
pub struct SimVessel {
    pub id: VesselId,
    pub name: String,
    pub class: VesselClass,
    pub parts: Vec<SimPart>,
}

impl SimVessel {
    pub fn new(name: impl Into<String>, class: VesselClass) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class,
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: SimPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn remove_part(&mut self, id: PartId) -> bool {
        let before = self.parts.len();
        self.parts.retain(|p| p.id != id);
        self.parts.len() != before
    }

    /// Direct access to a part's telemetry for scripting and assertions.
    pub fn telemetry_of(&self, id: PartId) -> Option<&LinearTelemetry> {
        self.parts.iter().find(|p| p.id == id)?.telemetry.as_ref()
    }
}

impl Vessel for SimVessel {
    fn id(&self) -> VesselId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> VesselClass {
        self.class
    }

    fn part_ids(&self) -> Vec<PartId> {
        self.parts.iter().map(|p| p.id).collect()
    }

    fn part(&self, id: PartId) -> Option<&dyn Part> {
        self.parts.iter().find(|p| p.id == id).map(|p| p as &dyn Part)
    }

    fn part_mut(&mut self, id: PartId) -> Option<&mut dyn Part> {
        self.parts
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p as &mut dyn Part)
    }
}

/// A whole scripted simulation.
#[derive(Debug, Clone, Default)]
pub struct SimWorld {
    pub now: f64,
    pub vessels: Vec<SimVessel>,
    pub active: Option<VesselId>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulation clock.
    pub fn set_now(&mut self, now: f64) {
        self.now = now;
    }

    /// Add a vessel; the first one added becomes active.
    pub fn add_vessel(&mut self, vessel: SimVessel) -> VesselId {
        let id = vessel.id;
        if self.active.is_none() {
            self.active = Some(id);
        }
        self.vessels.push(vessel);
        id
    }

    /// Remove a vessel from the simulation entirely.
    pub fn remove_vessel(&mut self, id: VesselId) -> bool {
        let before = self.vessels.len();
        self.vessels.retain(|v| v.id != id);
        if self.active == Some(id) {
            self.active = None;
        }
        self.vessels.len() != before
    }

    pub fn set_active(&mut self, id: Option<VesselId>) {
        self.active = id;
    }

    /// Reclassify a vessel (e.g. a spent stage becoming debris).
    pub fn set_class(&mut self, id: VesselId, class: VesselClass) -> bool {
        match self.vessels.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.class = class;
                true
            }
            None => false,
        }
    }

    /// Direct access for scripting and assertions.
    pub fn sim_vessel(&self, id: VesselId) -> Option<&SimVessel> {
        self.vessels.iter().find(|v| v.id == id)
    }

    /// Mutable direct access for scripting.
    pub fn sim_vessel_mut(&mut self, id: VesselId) -> Option<&mut SimVessel> {
        self.vessels.iter_mut().find(|v| v.id == id)
    }
}

impl World for SimWorld {
    fn now(&self) -> f64 {
        self.now
    }

    fn vessel_ids(&self) -> Vec<VesselId> {
        self.vessels.iter().map(|v| v.id).collect()
    }

    fn active_vessel(&self) -> Option<VesselId> {
        self.active
    }

    fn vessel(&self, id: VesselId) -> Option<&dyn Vessel> {
        self.vessels
            .iter()
            .find(|v| v.id == id)
            .map(|v| v as &dyn Vessel)
    }

    fn vessel_mut(&mut self, id: VesselId) -> Option<&mut dyn Vessel> {
        self.vessels
            .iter_mut()
            .find(|v| v.id == id)
            .map(|v| v as &mut dyn Vessel)
    }
}
