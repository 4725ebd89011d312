//! Error types for the settings crate.
//!
//! This module provides structured error types for preference edits,
//! configuration loading, and preference persistence.

use cellbroadcast_core::SubscriptionId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The logical key is not part of the declared key set.
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// A value does not fit the key's declared type.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// The key is not exposed on this subscription's settings surface.
    #[error("Setting '{key}' is not available for {subscription}")]
    NotExposed {
        key: String,
        subscription: SubscriptionId,
    },

    /// The control is currently disabled.
    #[error("Setting '{key}' is disabled")]
    ControlDisabled { key: String },

    /// The subscription slot does not exist on this device.
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(SubscriptionId),

    /// A configuration error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A persistence error occurred.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is out of valid range.
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// Platform is not supported for config directory resolution.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// I/O error while reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Errors related to preference persistence.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The preference file exists but cannot be understood.
    #[error("Corrupted preference file {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    /// The backend refused the write.
    #[error("Write of '{key}' failed: {reason}")]
    WriteFailed { key: String, reason: String },

    /// I/O error during persistence.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON error during persistence.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_display() {
        let err = SettingsError::InvalidSetting {
            key: "alert_sound_duration".to_string(),
            reason: "'3' is not one of 2, 4, 5, 6, 8, 10".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid setting 'alert_sound_duration': '3' is not one of 2, 4, 5, 6, 8, 10"
        );

        let err = SettingsError::NotExposed {
            key: "enable_channel_60_alerts".to_string(),
            subscription: SubscriptionId(0),
        };
        assert_eq!(
            err.to_string(),
            "Setting 'enable_channel_60_alerts' is not available for SUB1"
        );

        let err = SettingsError::UnknownSubscription(SubscriptionId(3));
        assert_eq!(err.to_string(), "Unknown subscription: SUB4");
    }

    #[test]
    fn test_error_conversion() {
        let err: SettingsError = PersistenceError::WriteFailed {
            key: "enable_alert_speech0".to_string(),
            reason: "disk full".to_string(),
        }
        .into();
        assert!(matches!(err, SettingsError::Persistence(_)));

        let err: SettingsError = ConfigError::UnsupportedFormat("yaml".to_string()).into();
        assert!(matches!(err, SettingsError::Config(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: PersistenceError = io_err.into();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
