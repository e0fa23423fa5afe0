//! Known-vessel cache with first-seen timestamps.

use std::collections::BTreeMap;

use flightwatch_types::{VesselClass, VesselId};
use tracing::debug;

use crate::world::World;

/// Tracks which vessels the engine currently knows about, and when each was
/// first seen.
///
/// The first-seen timestamp stands in for a mission start time: the host
/// simulation may not consider a vessel launched until its first stage
/// fires, which makes things like stationary engine test stands impossible
/// to time. Caching the vessel the first time it is observed and using that
/// timestamp instead sidesteps the problem.
///
/// A cached timestamp never changes while the entry lives. If a vessel is
/// pruned and the same identity reappears later, it is cached anew with a
/// fresh timestamp - re-acquisition re-arms the mission start.
#[derive(Debug, Clone, Default)]
pub struct VesselCache {
    vessels: BTreeMap<VesselId, f64>,
}

impl VesselCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cache up to date with the live simulation.
    ///
    /// First prunes entries whose vessel is gone from the world or has become
    /// debris (regardless of mode). Then inserts newcomers: only the active
    /// vessel when `track_all` is false, or every vessel passing `eligible`
    /// when true, each stamped with `now` as its first-seen time.
    ///
    /// Returns the newly inserted identities so the caller can run one-time
    /// initialization for them. Idempotent for an unchanged world.
    pub fn refresh(
        &mut self,
        now: f64,
        world: &dyn World,
        eligible: &dyn Fn(VesselClass) -> bool,
        track_all: bool,
    ) -> Vec<VesselId> {
        let stale: Vec<VesselId> = self
            .vessels
            .keys()
            .copied()
            .filter(|id| match world.vessel(*id) {
                None => true,
                Some(vessel) => vessel.class() == VesselClass::Debris,
            })
            .collect();
        for id in stale {
            debug!(vessel = %id, "dropping vessel from cache");
            self.vessels.remove(&id);
        }

        let mut added = Vec::new();
        if track_all {
            for id in world.vessel_ids() {
                let Some(vessel) = world.vessel(id) else { continue };
                if eligible(vessel.class()) && !self.vessels.contains_key(&id) {
                    debug!(vessel = %id, name = vessel.name(), first_seen = now, "caching vessel");
                    self.vessels.insert(id, now);
                    added.push(id);
                }
            }
        } else if let Some(id) = world.active_vessel() {
            if !self.vessels.contains_key(&id) {
                debug!(vessel = %id, first_seen = now, "caching active vessel");
                self.vessels.insert(id, now);
                added.push(id);
            }
        }
        added
    }

    /// First-seen timestamp for a cached vessel.
    pub fn first_seen(&self, id: VesselId) -> Option<f64> {
        self.vessels.get(&id).copied()
    }

    /// Whether a vessel is currently cached.
    pub fn contains(&self, id: VesselId) -> bool {
        self.vessels.contains_key(&id)
    }

    /// Snapshot of every cached `(vessel, first_seen)` pair.
    pub fn entries(&self) -> Vec<(VesselId, f64)> {
        self.vessels.iter().map(|(id, t)| (*id, *t)).collect()
    }

    /// Restore entries from persisted state.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = (VesselId, f64)>) {
        for (id, first_seen) in entries {
            self.vessels.insert(id, first_seen);
        }
    }

    /// Number of cached vessels.
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    /// Check whether any vessel is cached.
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }
}
