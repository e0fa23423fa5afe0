//! Error types for the engine.

use thiserror::Error;

/// Errors that can occur when loading or saving persisted state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing the state file failed.
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the structured state form failed.
    #[error("state encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading or saving engine settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The configuration sources could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),

    /// Writing the settings file failed.
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the settings file failed.
    #[error("settings encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
