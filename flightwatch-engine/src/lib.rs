//! # flightwatch-engine
//!
//! Stateful tracking engine for vessel flight data and reliability status.
//!
//! The engine observes a host simulation through a narrow read-only boundary
//! (the [`world`] traits), polls each tracked part's telemetry provider at
//! configurable intervals, and maintains three pieces of state:
//!
//! - a durable per-part [`HistoryStore`], merged with a scope-aware
//!   max-accumulation rule and persisted across save/reload cycles;
//! - a [`VesselCache`] of known vessels with immutable first-seen
//!   timestamps, standing in for mission start times;
//! - a continuously reconciled [`MasterStatus`] snapshot, the read surface
//!   for display frontends.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Tracker                             │
//! │  tick(world) ──▶ VesselCache ──▶ telemetry polls ──┐         │
//! │                      │                             ▼         │
//! │                      │                       MasterStatus ──▶ snapshot()
//! │                      │                             │         │
//! │                      ▼                             ▼         │
//! │                HistoryStore ◀──────────────── samples        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use flightwatch_engine::{Settings, Tracker};
//! use flightwatch_engine::sim::{LinearTelemetry, SimPart, SimVessel, SimWorld};
//! use flightwatch_types::VesselClass;
//!
//! // A stationary test stand with one instrumented engine.
//! let mut world = SimWorld::new();
//! let vessel = world.add_vessel(
//!     SimVessel::new("Test Stand", VesselClass::Ship)
//!         .with_part(SimPart::new(1, "engine", LinearTelemetry::new("test stand", 1.0))),
//! );
//!
//! // Tick the engine the way a host scheduling loop would.
//! let mut tracker = Tracker::new(Settings::default());
//! world.set_now(0.0);
//! tracker.tick(&mut world);
//! world.set_now(1.0);
//! tracker.tick(&mut world);
//!
//! let status = tracker.master_status().get(vessel).unwrap();
//! assert_eq!(status.parts.len(), 1);
//! assert!(tracker.history().history_for("engine").is_some());
//! ```
//!
//! ## Features
//!
//! - `tokio`: the [`driver`] module, a background tick loop for hosts
//!   without a scheduling loop of their own.

pub mod cache;
pub mod error;
pub mod feed;
pub mod history;
pub mod persist;
pub mod settings;
pub mod sim;
pub mod status;
pub mod telemetry;
pub mod tracker;
pub mod world;

#[cfg(feature = "tokio")]
pub mod driver;

pub use cache::VesselCache;
pub use error::{PersistError, SettingsError};
pub use feed::StatusFeed;
pub use history::HistoryStore;
pub use persist::SavedState;
pub use settings::Settings;
pub use status::MasterStatus;
pub use telemetry::Telemetry;
pub use tracker::Tracker;

// Re-export the schema crate for convenience.
pub use flightwatch_types as types;
