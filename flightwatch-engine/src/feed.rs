//! Shared read surface for presentation collaborators.

use std::collections::BTreeMap;
use std::sync::Arc;

use flightwatch_types::{VesselId, VesselStatus};
use parking_lot::RwLock;

/// A cloneable handle onto the latest published master status.
///
/// The engine (or the background driver) publishes after each data poll; any
/// number of readers poll [`read`](Self::read) at their own display cadence,
/// ungated by the engine's intervals. Clones share the same underlying
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatusFeed {
    inner: Arc<RwLock<BTreeMap<VesselId, VesselStatus>>>,
}

impl StatusFeed {
    /// Create an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published snapshot.
    pub fn publish(&self, status: BTreeMap<VesselId, VesselStatus>) {
        *self.inner.write() = status;
    }

    /// Copy out the latest published snapshot.
    pub fn read(&self) -> BTreeMap<VesselId, VesselStatus> {
        self.inner.read().clone()
    }

    /// Copy out one vessel's status group.
    pub fn get(&self, vessel_id: VesselId) -> Option<VesselStatus> {
        self.inner.read().get(&vessel_id).cloned()
    }

    /// Number of vessel groups in the published snapshot.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check whether anything has been published.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
