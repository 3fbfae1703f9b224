//! Core error types for cycletrack-core.
//!
//! This module defines the error hierarchy using thiserror. Estimator
//! outcomes that are not failures of the program (too few dates, no usable
//! gaps) live in [`crate::estimator::InsufficientData`] instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::estimator::InsufficientData;

/// Core error type for cycletrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Date store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No prediction could be made from the history
    #[error("No prediction available: {0}")]
    Insufficient(#[from] InsufficientData),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::storage::DateStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached, read or written.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The stored history changed after it was loaded.
    #[error("Store conflict: expected revision {expected}, found {found}")]
    Conflict { expected: i64, found: i64 },

    /// A stored row could not be decoded.
    #[error("Corrupt entry '{value}' in store")]
    Corrupt { value: String },
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Date text in none of the accepted formats
    #[error("Unrecognised date '{input}' (expected dd/mm/yyyy or yyyy-mm-dd)")]
    InvalidDate { input: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
