//! The tick-driven tracking engine.

use std::collections::BTreeSet;

use flightwatch_types::{PartId, PartStatus, SchemaVersion, ScopeRecord, VesselClass, VesselId};
use tracing::{debug, warn};

use crate::cache::VesselCache;
use crate::history::HistoryStore;
use crate::persist::{KnownVesselEntry, SavedState};
use crate::settings::Settings;
use crate::status::MasterStatus;
use crate::world::World;

/// The stateful polling engine.
///
/// Call [`tick`](Self::tick) once per host scheduling frame. Each tick
/// refreshes the vessel cache and then runs up to three independently
/// gated passes:
///
/// - **data poll** (`min_time_between_data_poll`): advances every tracked
///   part's telemetry, rebuilds its [`PartStatus`] in the master status, and
///   folds the sample into the flight-data history;
/// - **failure poll** (`min_time_between_failure_poll`): gives every
///   provider the chance to roll a failure;
/// - **status verification** (`master_status_update_frequency`): sweeps
///   stale vessels and parts out of the master status.
///
/// A timer only advances after its full pass over every tracked vessel has
/// completed, never mid-pass, so an interval is retried until a whole pass
/// lands.
///
/// All state is owned exclusively by the engine; collaborators read the
/// exposed [`master_status`](Self::master_status) view and nothing else.
#[derive(Debug, Default)]
pub struct Tracker {
    settings: Settings,
    history: HistoryStore,
    cache: VesselCache,
    status: MasterStatus,
    /// Vessels restored from persisted state whose parts still need their
    /// one-time history initialization.
    pending_init: BTreeSet<VesselId>,
    last_data_poll: f64,
    last_failure_poll: f64,
    last_status_verify: f64,
}

impl Tracker {
    /// Create a fresh engine with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Rebuild an engine from persisted state.
    ///
    /// Flight-data histories and first-seen timestamps survive the reload;
    /// restored vessels get their one-time part initialization on the first
    /// tick that observes them alive.
    pub fn from_saved(settings: Settings, state: SavedState) -> Self {
        if !state.version.is_compatible() {
            warn!(
                major = state.version.major,
                minor = state.version.minor,
                "loading state written by an incompatible schema version"
            );
        }
        let mut tracker = Self::new(settings);
        tracker
            .cache
            .restore(state.vessels.iter().map(|e| (e.vessel_id, e.first_seen)));
        tracker.pending_init = state.vessels.iter().map(|e| e.vessel_id).collect();
        for history in state.parts {
            tracker.history.insert(history);
        }
        tracker
    }

    /// Capture everything worth persisting.
    pub fn to_saved(&self) -> SavedState {
        SavedState {
            version: SchemaVersion::current(),
            vessels: self
                .cache
                .entries()
                .into_iter()
                .map(|(vessel_id, first_seen)| KnownVesselEntry {
                    vessel_id,
                    first_seen,
                })
                .collect(),
            parts: self.history.iter().cloned().collect(),
        }
    }

    /// Run one scheduling tick against the live simulation.
    pub fn tick(&mut self, world: &mut dyn World) {
        let now = world.now();

        let mut to_init = self.cache.refresh(
            now,
            &*world,
            &|class: VesselClass| class.is_trackable(),
            self.settings.process_all_vessels,
        );
        self.drain_pending_init(&*world, &mut to_init);
        for vessel_id in to_init {
            self.initialize_parts(world, vessel_id);
        }

        if now >= self.last_status_verify + self.settings.master_status_update_frequency {
            debug!(now, "verifying master status");
            self.status.reconcile(&*world);
            self.last_status_verify = now;
        }

        let data_due = now >= self.last_data_poll + self.settings.min_time_between_data_poll;
        let failure_due =
            now >= self.last_failure_poll + self.settings.min_time_between_failure_poll;
        if data_due || failure_due {
            for (vessel_id, first_seen) in self.cache.entries() {
                self.poll_vessel(world, vessel_id, first_seen, now, data_due, failure_due);
            }
            // Timers advance only once the full pass has completed.
            if data_due {
                self.last_data_poll = now;
            }
            if failure_due {
                self.last_failure_poll = now;
            }
        }
    }

    /// Move restored vessels that are alive again into the to-initialize
    /// list; forget pending entries the cache has already pruned.
    fn drain_pending_init(&mut self, world: &dyn World, to_init: &mut Vec<VesselId>) {
        if self.pending_init.is_empty() {
            return;
        }
        let pending: Vec<VesselId> = self.pending_init.iter().copied().collect();
        for id in pending {
            if !self.cache.contains(id) {
                self.pending_init.remove(&id);
            } else if world.vessel(id).is_some() {
                self.pending_init.remove(&id);
                to_init.push(id);
            }
        }
    }

    /// One-time initialization for a newly cached vessel: seed every
    /// telemetry-capable part with the persisted history for its part name.
    fn initialize_parts(&mut self, world: &mut dyn World, vessel_id: VesselId) {
        let reliability_modifier = self.settings.global_reliability_modifier;
        let Some(vessel) = world.vessel_mut(vessel_id) else {
            return;
        };
        debug!(vessel = %vessel_id, name = vessel.name(), "initializing parts");
        for part_id in vessel.part_ids() {
            let Some(part) = vessel.part_mut(part_id) else {
                continue;
            };
            let prior: Vec<ScopeRecord> = self
                .history
                .history_for(part.name())
                .map(|h| h.records.clone())
                .unwrap_or_default();
            let Some(telemetry) = part.telemetry_mut() else {
                continue;
            };
            telemetry.initialize_history(&prior, reliability_modifier);
        }
    }

    fn poll_vessel(
        &mut self,
        world: &mut dyn World,
        vessel_id: VesselId,
        first_seen: f64,
        now: f64,
        data_due: bool,
        failure_due: bool,
    ) {
        let data_multiplier = self.settings.flight_data_multiplier;
        let engineer_multiplier = self.settings.flight_data_engineer_multiplier;
        let reliability_modifier = self.settings.global_reliability_modifier;

        let Some(vessel) = world.vessel_mut(vessel_id) else {
            return;
        };
        let vessel_name = vessel.name().to_string();
        for part_id in vessel.part_ids() {
            let Some(part) = vessel.part_mut(part_id) else {
                continue;
            };
            let part_name = part.name().to_string();
            let part_title = part.title().to_string();
            let Some(telemetry) = part.telemetry_mut() else {
                continue;
            };

            if data_due {
                debug!(vessel = %vessel_id, part = part_id, name = %part_name, "polling part");
                telemetry.advance(
                    now,
                    first_seen,
                    data_multiplier,
                    engineer_multiplier,
                    reliability_modifier,
                );
                let sample = telemetry.current_sample();
                let status_code = telemetry.status_code();
                let status = PartStatus {
                    part_id,
                    part_name: part_title,
                    flight_data: sample.flight_data,
                    flight_time: sample.flight_time,
                    status_code,
                    reliability: telemetry.reliability(reliability_modifier),
                    active_failure: if status_code > 0 {
                        telemetry.active_failure()
                    } else {
                        None
                    },
                    highlighted: false,
                    repair_requirements: telemetry.requirements_tooltip(),
                };
                self.status.upsert(vessel_id, &vessel_name, status);
                self.history
                    .record_sample(&part_name, &sample.scope, sample.flight_data);
            }

            if failure_due {
                telemetry.failure_check(now, first_seen, reliability_modifier);
            }
        }
    }

    /// Toggle display highlighting on a tracked part, forwarding to its
    /// telemetry provider and mirroring the flag into the master status.
    /// Returns whether a status entry existed for the part.
    pub fn set_part_highlighted(
        &mut self,
        world: &mut dyn World,
        vessel_id: VesselId,
        part_id: PartId,
        highlighted: bool,
    ) -> bool {
        if let Some(telemetry) = world
            .vessel_mut(vessel_id)
            .and_then(|v| v.part_mut(part_id))
            .and_then(|p| p.telemetry_mut())
        {
            telemetry.set_highlighted(highlighted);
        }
        self.status.set_highlighted(vessel_id, part_id, highlighted)
    }

    /// Ask a part's telemetry provider to repair its active failure.
    /// The status entry reflects the outcome on the next data poll.
    pub fn attempt_repair(
        &mut self,
        world: &mut dyn World,
        vessel_id: VesselId,
        part_id: PartId,
    ) -> bool {
        world
            .vessel_mut(vessel_id)
            .and_then(|v| v.part_mut(part_id))
            .and_then(|p| p.telemetry_mut())
            .map(|t| t.attempt_repair())
            .unwrap_or(false)
    }

    /// The continuously reconciled status view.
    pub fn master_status(&self) -> &MasterStatus {
        &self.status
    }

    /// The durable flight-data history.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// The known-vessel cache.
    pub fn cache(&self) -> &VesselCache {
        &self.cache
    }

    /// The engine's settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LinearTelemetry, SimPart, SimVessel, SimWorld};
    use flightwatch_types::{FailureInfo, FailureSeverity, VesselClass};

    fn test_stand() -> (SimWorld, VesselId) {
        let mut world = SimWorld::new();
        let id = world.add_vessel(
            SimVessel::new("Test Stand", VesselClass::Ship)
                .with_part(SimPart::new(1, "engine", LinearTelemetry::new("test stand", 1.0))),
        );
        (world, id)
    }

    fn advances(world: &SimWorld, vessel: VesselId, part: PartId) -> u32 {
        world.sim_vessel(vessel).unwrap().telemetry_of(part).unwrap().advances
    }

    #[test]
    fn data_poll_gating_scenario() {
        let (mut world, vessel) = test_stand();
        let mut tracker = Tracker::new(Settings::default());

        // t=0: vessel first seen, but 0 < 0 + 0.5 so no poll yet
        world.set_now(0.0);
        tracker.tick(&mut world);
        assert_eq!(tracker.cache.first_seen(vessel), Some(0.0));
        assert!(tracker.status.is_empty());
        assert!(tracker.history.is_empty());
        assert_eq!(advances(&world, vessel, 1), 0);

        // t=0.6: poll fires, status and history appear
        world.set_now(0.6);
        tracker.tick(&mut world);
        assert_eq!(tracker.last_data_poll, 0.6);
        assert_eq!(tracker.status.get(vessel).unwrap().len(), 1);
        assert_eq!(tracker.history.len(), 1);
        assert_eq!(advances(&world, vessel, 1), 1);

        // t=0.9: elapsed 0.3 < 0.5, nothing happens
        world.set_now(0.9);
        tracker.tick(&mut world);
        assert_eq!(tracker.last_data_poll, 0.6);
        assert_eq!(advances(&world, vessel, 1), 1);

        // t=1.1: poll fires again
        world.set_now(1.1);
        tracker.tick(&mut world);
        assert_eq!(tracker.last_data_poll, 1.1);
        assert_eq!(advances(&world, vessel, 1), 2);
    }

    #[test]
    fn one_pass_covers_every_tracked_vessel() {
        let mut world = SimWorld::new();
        let a = world.add_vessel(
            SimVessel::new("Alpha", VesselClass::Ship)
                .with_part(SimPart::new(1, "engine", LinearTelemetry::new("space", 1.0))),
        );
        let b = world.add_vessel(
            SimVessel::new("Beta", VesselClass::Probe)
                .with_part(SimPart::new(1, "probe-core", LinearTelemetry::new("space", 1.0))),
        );
        let settings = Settings {
            process_all_vessels: true,
            ..Settings::default()
        };
        let mut tracker = Tracker::new(settings);

        world.set_now(1.0);
        tracker.tick(&mut world);

        // both vessels polled in the same pass, timer advanced once
        assert_eq!(advances(&world, a, 1), 1);
        assert_eq!(advances(&world, b, 1), 1);
        assert_eq!(tracker.last_data_poll, 1.0);
        assert_eq!(tracker.status.len(), 2);
    }

    #[test]
    fn failure_poll_runs_at_its_own_cadence() {
        let mut world = SimWorld::new();
        let vessel = world.add_vessel(
            SimVessel::new("Test Stand", VesselClass::Ship).with_part(SimPart::new(
                1,
                "engine",
                LinearTelemetry::new("test stand", 1.0).failing_after(
                    30.0,
                    FailureInfo::new("Turbopump seizure", FailureSeverity::Major),
                ),
            )),
        );
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(0.0);
        tracker.tick(&mut world);

        // data polls happen, failure polls do not (interval is 60)
        world.set_now(1.0);
        tracker.tick(&mut world);
        let telemetry = world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap();
        assert_eq!(telemetry.failure_checks, 0);

        // past the failure interval: check runs and the scripted failure fires
        world.set_now(61.0);
        tracker.tick(&mut world);
        let telemetry = world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap();
        assert_eq!(telemetry.failure_checks, 1);
        assert_eq!(telemetry.status_code, 1);

        // next tick within the interval: no second check, but the data poll
        // picks the failure up into the snapshot
        world.set_now(61.7);
        tracker.tick(&mut world);
        let telemetry = world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap();
        assert_eq!(telemetry.failure_checks, 1);
        let part = tracker.status.get(vessel).unwrap().part(1).unwrap();
        assert_eq!(part.status_code, 1);
        let failure = part.active_failure.as_ref().unwrap();
        assert_eq!(failure.title, "Turbopump seizure");
        assert_eq!(failure.severity, FailureSeverity::Major);
    }

    #[test]
    fn verification_sweeps_on_the_coarse_interval() {
        let (mut world, vessel) = test_stand();
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(0.0);
        tracker.tick(&mut world);
        world.set_now(1.0);
        tracker.tick(&mut world);
        assert!(tracker.status.get(vessel).is_some());

        // vessel disappears: cache notices immediately, snapshot does not
        world.remove_vessel(vessel);
        world.set_now(2.0);
        tracker.tick(&mut world);
        assert!(!tracker.cache.contains(vessel));
        assert!(tracker.status.get(vessel).is_some());

        // the sweep at the 10s cadence removes the stale group
        world.set_now(10.0);
        tracker.tick(&mut world);
        assert!(tracker.status.get(vessel).is_none());
    }

    #[test]
    fn new_vessel_parts_are_seeded_with_prior_history() {
        let (mut world, vessel) = test_stand();
        let mut tracker = Tracker::new(Settings::default());
        // history recorded by an earlier instance of the same part type
        tracker.history.record_sample("engine", "test stand", 42.0);

        world.set_now(0.0);
        tracker.tick(&mut world);
        let telemetry = world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap();
        assert_eq!(telemetry.initializations, 1);
        assert_eq!(telemetry.flight_data, 42.0);

        // accumulated credit keeps growing from the seeded value
        world.set_now(0.6);
        tracker.tick(&mut world);
        let stored = tracker.history.history_for("engine").unwrap();
        assert!(stored.data_for_scope("test stand").unwrap() > 42.0);
    }

    #[test]
    fn parts_without_telemetry_are_skipped() {
        let mut world = SimWorld::new();
        let vessel = world.add_vessel(
            SimVessel::new("Alpha", VesselClass::Ship)
                .with_part(SimPart::inert(1, "strut"))
                .with_part(SimPart::new(2, "engine", LinearTelemetry::new("space", 1.0))),
        );
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(1.0);
        tracker.tick(&mut world);
        let group = tracker.status.get(vessel).unwrap();
        assert_eq!(group.len(), 1);
        assert!(group.part(2).is_some());
    }

    #[test]
    fn history_is_shared_across_vessels_by_part_name() {
        let mut world = SimWorld::new();
        world.add_vessel(
            SimVessel::new("Alpha", VesselClass::Ship)
                .with_part(SimPart::new(1, "engine", LinearTelemetry::new("space", 2.0))),
        );
        world.add_vessel(
            SimVessel::new("Beta", VesselClass::Ship)
                .with_part(SimPart::new(1, "engine", LinearTelemetry::new("space", 1.0))),
        );
        let settings = Settings {
            process_all_vessels: true,
            ..Settings::default()
        };
        let mut tracker = Tracker::new(settings);

        world.set_now(0.0);
        tracker.tick(&mut world);
        world.set_now(10.0);
        tracker.tick(&mut world);

        // one history entry, holding the max across both instances
        assert_eq!(tracker.history.len(), 1);
        let data = tracker
            .history
            .history_for("engine")
            .unwrap()
            .data_for_scope("space")
            .unwrap();
        assert_eq!(data, 20.0);
    }

    #[test]
    fn status_uses_display_title_and_history_uses_type_name() {
        let mut world = SimWorld::new();
        let vessel = world.add_vessel(
            SimVessel::new("Alpha", VesselClass::Ship).with_part(
                SimPart::new(1, "liquidEngine2", LinearTelemetry::new("space", 1.0))
                    .with_title("LV-T45 Liquid Fuel Engine"),
            ),
        );
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(1.0);
        tracker.tick(&mut world);

        let part = tracker.status.get(vessel).unwrap().part(1).unwrap();
        assert_eq!(part.part_name, "LV-T45 Liquid Fuel Engine");
        assert!(tracker.history.history_for("liquidEngine2").is_some());
    }

    #[test]
    fn highlight_toggle_reaches_provider_and_snapshot() {
        let (mut world, vessel) = test_stand();
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(1.0);
        tracker.tick(&mut world);

        assert!(tracker.set_part_highlighted(&mut world, vessel, 1, true));
        assert!(world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap().highlighted);
        assert!(tracker.status.get(vessel).unwrap().part(1).unwrap().highlighted);

        // the flag survives the next poll's replacement
        world.set_now(2.0);
        tracker.tick(&mut world);
        assert!(tracker.status.get(vessel).unwrap().part(1).unwrap().highlighted);
    }

    #[test]
    fn repair_goes_through_the_provider() {
        let mut world = SimWorld::new();
        let vessel = world.add_vessel(
            SimVessel::new("Alpha", VesselClass::Ship).with_part(SimPart::new(
                1,
                "engine",
                LinearTelemetry::new("space", 1.0)
                    .failing_after(0.0, FailureInfo::new("Stuck valve", FailureSeverity::Minor)),
            )),
        );
        let settings = Settings {
            min_time_between_failure_poll: 1.0,
            ..Settings::default()
        };
        let mut tracker = Tracker::new(settings);

        world.set_now(0.0);
        tracker.tick(&mut world);
        world.set_now(2.0);
        tracker.tick(&mut world);
        assert_eq!(
            world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap().status_code,
            1
        );

        assert!(tracker.attempt_repair(&mut world, vessel, 1));
        assert_eq!(
            world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap().status_code,
            0
        );
        assert!(!tracker.attempt_repair(&mut world, vessel, 1));
    }

    #[test]
    fn saved_state_round_trips_through_reload() {
        let (mut world, vessel) = test_stand();
        let mut tracker = Tracker::new(Settings::default());

        world.set_now(3.0);
        tracker.tick(&mut world);
        world.set_now(4.0);
        tracker.tick(&mut world);
        let data_before = tracker
            .history
            .history_for("engine")
            .unwrap()
            .data_for_scope("test stand")
            .unwrap();

        let saved = tracker.to_saved();
        let mut reloaded = Tracker::from_saved(Settings::default(), saved);

        // first-seen survives the reload
        assert_eq!(reloaded.cache.first_seen(vessel), Some(3.0));
        assert_eq!(
            reloaded
                .history
                .history_for("engine")
                .unwrap()
                .data_for_scope("test stand"),
            Some(data_before)
        );

        // restored vessels are re-initialized on the first live tick
        world.set_now(5.0);
        reloaded.tick(&mut world);
        let telemetry = world.sim_vessel(vessel).unwrap().telemetry_of(1).unwrap();
        assert_eq!(telemetry.initializations, 2);
        // and keep their original first-seen, not a new one
        assert_eq!(reloaded.cache.first_seen(vessel), Some(3.0));
    }
}
