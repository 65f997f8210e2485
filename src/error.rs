//! Error types for storage, configuration and sensors.
//!
//! None of these are fatal to a running game: the engine logs and absorbs
//! them, falling back to defaults or a degraded mode.

use thiserror::Error;

/// Errors from a persisted key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid JSON object of integers.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading or saving tuning/settings files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error on the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed config JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value parsed but is out of its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors starting the tilt sampling pipeline.
#[derive(Debug, Error)]
pub enum TiltError {
    /// The device has no motion sensor.
    #[error("device motion is unavailable")]
    Unavailable,

    /// The pipeline is already sampling.
    #[error("tilt pipeline already running")]
    AlreadyRunning,

    /// The sampling thread could not be spawned.
    #[error("failed to spawn tilt thread: {0}")]
    Spawn(#[from] std::io::Error),
}
