//! Background tick driver (requires the `tokio` feature).

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::feed::StatusFeed;
use crate::tracker::Tracker;
use crate::world::World;

/// Drive a [`Tracker`] from a background tokio task.
///
/// Intended for standalone hosts that have no scheduling loop of their own:
/// the driver owns the tracker and the world, ticks at a fixed wall-clock
/// cadence, and publishes the master status into a [`StatusFeed`] after
/// every tick. Hosts with their own frame loop should call
/// [`Tracker::tick`] directly instead.
///
/// Returns a handle that can be used to read the feed and stop the task.
pub fn spawn<W>(mut tracker: Tracker, mut world: W, tick: Duration) -> DriverHandle
where
    W: World + Send + 'static,
{
    let feed = StatusFeed::new();
    let published = feed.clone();
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        let mut stop_rx = stop_rx;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tracker.tick(&mut world);
                    published.publish(tracker.master_status().snapshot().clone());
                }
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        debug!("tick driver stopping");
                        break;
                    }
                }
            }
        }
    });

    DriverHandle { stop_tx, feed }
}

/// Handle for observing and stopping a background driver.
///
/// Drop the handle to leave the driver running detached, or call
/// [`stop`](Self::stop) to end it.
pub struct DriverHandle {
    stop_tx: watch::Sender<bool>,
    feed: StatusFeed,
}

impl DriverHandle {
    /// The feed the driver publishes into.
    pub fn feed(&self) -> StatusFeed {
        self.feed.clone()
    }

    /// Stop the background task.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{LinearTelemetry, SimPart, SimVessel, SimWorld};
    use crate::world::Vessel;
    use flightwatch_types::{VesselClass, VesselId};
    use std::cell::Cell;

    /// Wraps a [`SimWorld`] with a clock that steps forward on every
    /// `now()` call, so each driver tick sees time advance.
    struct TickingWorld {
        inner: SimWorld,
        step: f64,
        t: Cell<f64>,
    }

    impl World for TickingWorld {
        fn now(&self) -> f64 {
            let t = self.t.get() + self.step;
            self.t.set(t);
            t
        }

        fn vessel_ids(&self) -> Vec<VesselId> {
            self.inner.vessel_ids()
        }

        fn active_vessel(&self) -> Option<VesselId> {
            self.inner.active_vessel()
        }

        fn vessel(&self, id: VesselId) -> Option<&dyn Vessel> {
            self.inner.vessel(id)
        }

        fn vessel_mut(&mut self, id: VesselId) -> Option<&mut dyn Vessel> {
            self.inner.vessel_mut(id)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn driver_publishes_into_the_feed() {
        let mut sim = SimWorld::new();
        let vessel = sim.add_vessel(
            SimVessel::new("Test Stand", VesselClass::Ship)
                .with_part(SimPart::new(1, "engine", LinearTelemetry::new("test stand", 1.0))),
        );
        let world = TickingWorld {
            inner: sim,
            step: 1.0,
            t: Cell::new(0.0),
        };

        let handle = spawn(
            Tracker::new(Settings::default()),
            world,
            Duration::from_millis(10),
        );
        let feed = handle.feed();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!feed.is_empty());
        assert_eq!(feed.get(vessel).unwrap().parts.len(), 1);

        handle.stop();
    }
}
