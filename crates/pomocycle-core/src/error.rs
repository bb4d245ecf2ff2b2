//! Core error types for pomocycle-core.
//!
//! The timer path itself has no failure modes. Errors only come from
//! configuration (rejected values, unreadable files) and from audio sinks,
//! and both are meant to degrade quietly rather than stop the timer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A configuration value or file was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The audio cue sink could not produce a sound.
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Duration that is zero or negative.
    #[error("'{key}' must be a positive number of minutes, got {value}")]
    NonPositiveDuration { key: String, value: i64 },

    /// Value that could not be parsed for its key.
    #[error("cannot parse '{value}' for '{key}'")]
    Unparseable { key: String, value: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}
