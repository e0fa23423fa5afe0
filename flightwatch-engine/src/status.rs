//! The live master status snapshot.

use std::collections::{BTreeMap, BTreeSet};

use flightwatch_types::{PartId, PartStatus, VesselClass, VesselId, VesselStatus};
use tracing::{debug, error};

use crate::world::World;

/// Continuously reconciled status view: one [`VesselStatus`] group per
/// tracked vessel, each holding the latest [`PartStatus`] per part instance.
///
/// Writes go through [`upsert`](Self::upsert) on the fast poll path;
/// [`reconcile`](Self::reconcile) sweeps out stale vessels and parts at the
/// much coarser verification cadence, so its full scan never runs per tick.
#[derive(Debug, Clone, Default)]
pub struct MasterStatus {
    vessels: BTreeMap<VesselId, VesselStatus>,
}

impl MasterStatus {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the status entry for one part.
    ///
    /// Creates the vessel group on first sight. A status with the same
    /// `part_id` is replaced in place, carrying the highlight flag over so a
    /// display toggle survives the next poll. Duplicate entries for one part
    /// should be impossible; if they are ever observed the first match is
    /// replaced, the rest are left for the next reconcile, and the
    /// inconsistency is logged rather than treated as fatal.
    pub fn upsert(&mut self, vessel_id: VesselId, vessel_name: &str, status: PartStatus) {
        let group = self
            .vessels
            .entry(vessel_id)
            .or_insert_with(|| VesselStatus::new(vessel_id, vessel_name));

        let matches = group
            .parts
            .iter()
            .filter(|p| p.part_id == status.part_id)
            .count();
        if matches > 1 {
            error!(
                vessel = %vessel_id,
                part = status.part_id,
                matches,
                "found duplicate part entries in master status"
            );
        }
        match group.parts.iter().position(|p| p.part_id == status.part_id) {
            Some(index) => {
                let mut status = status;
                status.highlighted = group.parts[index].highlighted;
                group.parts[index] = status;
            }
            None => group.parts.push(status),
        }
    }

    /// Sweep out entries that no longer correspond to anything live.
    ///
    /// Vessel groups are removed when their vessel is gone from the world or
    /// has become debris; within surviving groups, part entries are removed
    /// when the part instance no longer exists on the vessel.
    pub fn reconcile(&mut self, world: &dyn World) {
        let dead: Vec<VesselId> = self
            .vessels
            .keys()
            .copied()
            .filter(|id| match world.vessel(*id) {
                None => true,
                Some(vessel) => vessel.class() == VesselClass::Debris,
            })
            .collect();
        for id in dead {
            debug!(vessel = %id, "removing vessel from master status");
            self.vessels.remove(&id);
        }

        for (id, group) in self.vessels.iter_mut() {
            let Some(vessel) = world.vessel(*id) else { continue };
            let live: BTreeSet<PartId> = vessel.part_ids().into_iter().collect();
            let before = group.parts.len();
            group.parts.retain(|p| live.contains(&p.part_id));
            if group.parts.len() != before {
                debug!(
                    vessel = %id,
                    removed = before - group.parts.len(),
                    "removed stale parts from master status"
                );
            }
        }
    }

    /// Read-only view of the whole snapshot, for presentation collaborators.
    pub fn snapshot(&self) -> &BTreeMap<VesselId, VesselStatus> {
        &self.vessels
    }

    /// Status group for one vessel.
    pub fn get(&self, vessel_id: VesselId) -> Option<&VesselStatus> {
        self.vessels.get(&vessel_id)
    }

    /// Flip the highlight flag on a part's status entry. Returns whether the
    /// entry existed.
    pub fn set_highlighted(&mut self, vessel_id: VesselId, part_id: PartId, highlighted: bool) -> bool {
        let Some(group) = self.vessels.get_mut(&vessel_id) else {
            return false;
        };
        match group.parts.iter_mut().find(|p| p.part_id == part_id) {
            Some(part) => {
                part.highlighted = highlighted;
                true
            }
            None => false,
        }
    }

    /// Number of tracked vessel groups.
    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    /// Check whether any vessel group exists.
    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }
}
