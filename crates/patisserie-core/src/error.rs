//! Core error types for patisserie-core.
//!
//! Every failure the countdown can hit is recoverable. Validation errors are
//! reported back to the caller with no state change. [`PlaybackError`] never
//! leaves the controller: the alarm loop reports it and keeps going.
//! Configuration errors only reach the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for patisserie-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input (the `InvalidInput` class)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors raised by `start`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Both pickers at zero.
    #[error("duration must be greater than zero")]
    ZeroDuration,

    /// A picker value outside its range.
    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// Alarm playback errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No sound resource was loaded (or it was already released).
    #[error("alarm sound is not loaded")]
    NotLoaded,

    /// The device has nowhere to play the sound.
    #[error("no audio output available")]
    NoOutput,

    /// The audio backend reported a failure.
    #[error("audio backend failed: {0}")]
    Backend(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not locate or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<std::io::Error> for PlaybackError {
    fn from(err: std::io::Error) -> Self {
        PlaybackError::Backend(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_wraps_into_core_error() {
        let err: CoreError = ValidationError::ZeroDuration.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::ZeroDuration)));
        assert_eq!(
            err.to_string(),
            "Validation error: duration must be greater than zero"
        );
    }

    #[test]
    fn config_error_keeps_its_message() {
        let err: CoreError = ConfigError::UnknownKey("timer.nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: timer.nope"
        );
    }

    #[test]
    fn out_of_range_message_names_field() {
        let err = ValidationError::OutOfRange {
            field: "seconds",
            value: 75,
            max: 59,
        };
        assert_eq!(err.to_string(), "seconds must be between 0 and 59, got 75");
    }

    #[test]
    fn io_error_becomes_backend_playback_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: PlaybackError = io.into();
        assert_eq!(err, PlaybackError::Backend("pipe closed".into()));
    }
}
