//! The telemetry-provider capability implemented by tracked parts.

use flightwatch_types::{FailureInfo, ScopeRecord};

/// Live telemetry provider for one part instance.
///
/// The engine treats a provider as an opaque capability: it orchestrates
/// *when* these operations run and persists what they report, but never
/// recomputes the provider's internal accumulation or failure logic.
///
/// A part gains or loses this capability as its state changes, so the
/// engine resolves it fresh on every tick via [`Part::telemetry_mut`]
/// rather than caching it.
///
/// [`Part::telemetry_mut`]: crate::world::Part::telemetry_mut
pub trait Telemetry {
    /// Seed the provider with previously persisted records for its part
    /// type. Called once, when the owning vessel is first cached.
    fn initialize_history(&mut self, prior: &[ScopeRecord], reliability_modifier: f64);

    /// Run one flight update. The provider accumulates internally based on
    /// the current time, the vessel's first-seen timestamp (its effective
    /// mission start), and the global multipliers.
    fn advance(
        &mut self,
        now: f64,
        first_seen: f64,
        data_multiplier: f64,
        engineer_multiplier: f64,
        reliability_modifier: f64,
    );

    /// The provider's current sample: scope, accumulated data, and
    /// continuous session time.
    fn current_sample(&self) -> ScopeRecord;

    /// Current status code: 0 = nominal, >0 = degraded or failed.
    fn status_code(&self) -> i32;

    /// Current reliability on a 0-100 scale.
    fn reliability(&self, reliability_modifier: f64) -> f64;

    /// The failure currently affecting the part, if any.
    fn active_failure(&self) -> Option<FailureInfo>;

    /// Tooltip describing what a repair would require.
    fn requirements_tooltip(&self) -> String;

    /// Run one failure check. The provider decides internally whether a
    /// failure occurs; the engine only gates how often this may run.
    fn failure_check(&mut self, now: f64, first_seen: f64, reliability_modifier: f64);

    /// Attempt to repair an active failure. Returns whether it succeeded.
    fn attempt_repair(&mut self) -> bool;

    /// Toggle display highlighting on the underlying part.
    fn set_highlighted(&mut self, highlighted: bool);
}
