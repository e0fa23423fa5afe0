//! Engine configuration.

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SettingsError;

/// Tunable parameters for the tracking engine.
///
/// All time values are in simulation seconds. Defaults match the behavior
/// the engine shipped with historically, so a missing settings file changes
/// nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scales flight data accumulated by telemetry providers.
    pub flight_data_multiplier: f64,

    /// Additional flight-data scaling credited to engineer skill.
    pub flight_data_engineer_multiplier: f64,

    /// Global scaling applied to every reliability computation.
    pub global_reliability_modifier: f64,

    /// Minimum simulation time between telemetry data polls.
    pub min_time_between_data_poll: f64,

    /// Minimum simulation time between failure checks.
    pub min_time_between_failure_poll: f64,

    /// How often the master status snapshot is verified against the live
    /// simulation and stale entries are swept out.
    pub master_status_update_frequency: f64,

    /// Track every eligible vessel instead of only the active one.
    pub process_all_vessels: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flight_data_multiplier: 1.0,
            flight_data_engineer_multiplier: 1.0,
            global_reliability_modifier: 1.0,
            min_time_between_data_poll: 0.5,
            min_time_between_failure_poll: 60.0,
            master_status_update_frequency: 10.0,
            process_all_vessels: false,
        }
    }
}

impl Settings {
    /// Load settings from a configuration file with environment overrides.
    ///
    /// Keys may come from the file (TOML/JSON/YAML by extension), from
    /// `FLIGHTWATCH_*` environment variables, or fall back to defaults. A
    /// missing file is not an error - the defaults simply apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let mut builder = Config::builder();
        if path.exists() {
            builder = builder.add_source(File::from(path));
        } else {
            debug!(path = %path.display(), "settings file not found, using defaults");
        }
        let config = builder
            .add_source(Environment::with_prefix("FLIGHTWATCH").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load settings, writing a default settings file first if none exists.
    ///
    /// This keeps the on-disk file discoverable and editable even on a
    /// fresh install. The written file is JSON, so the path should carry a
    /// `.json` extension for [`load`](Self::load) to read it back.
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            Settings::default().save(path)?;
        }
        Self::load(path)
    }

    /// Write the settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_legacy_values() {
        let s = Settings::default();
        assert_eq!(s.flight_data_multiplier, 1.0);
        assert_eq!(s.flight_data_engineer_multiplier, 1.0);
        assert_eq!(s.global_reliability_modifier, 1.0);
        assert_eq!(s.min_time_between_data_poll, 0.5);
        assert_eq!(s.min_time_between_failure_poll, 60.0);
        assert_eq!(s.master_status_update_frequency, 10.0);
        assert!(!s.process_all_vessels);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(dir.path().join("settings.toml")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "min_time_between_data_poll = 2.0").unwrap();
        writeln!(file, "process_all_vessels = true").unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.min_time_between_data_poll, 2.0);
        assert!(s.process_all_vessels);
        // untouched keys keep their defaults
        assert_eq!(s.min_time_between_failure_poll, 60.0);
    }

    #[test]
    fn load_or_init_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let s = Settings::load_or_init(&path).unwrap();
        assert_eq!(s, Settings::default());
        assert!(path.exists());

        // a later edit to the file is picked up
        std::fs::write(&path, r#"{"min_time_between_data_poll": 5.0}"#).unwrap();
        let s = Settings::load_or_init(&path).unwrap();
        assert_eq!(s.min_time_between_data_poll, 5.0);
    }

    #[test]
    fn partial_json_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"global_reliability_modifier": 0.5}"#).unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.global_reliability_modifier, 0.5);
        assert_eq!(s.flight_data_multiplier, 1.0);
    }
}
