//! Core error types for shoresafe-core.
//!
//! Deadline and alert math is total and never fails. Errors only come from
//! the edges: storage, configuration, caller input and the crew pass ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shoresafe-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Crew pass errors
    #[error("Pass error: {0}")]
    Pass(#[from] PassError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Data directory could not be created or resolved
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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
}

/// Validation errors for caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Time could not be parsed
    #[error("Invalid time '{input}': expected HH:MM or RFC 3339")]
    InvalidTime { input: String },

    /// Date could not be parsed
    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    /// Unknown identifier
    #[error("No {kind} with id {id}")]
    NotFound { kind: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Crew pass ledger errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PassError {
    #[error("Invalid pass type: {0}")]
    InvalidType(String),

    #[error("Share code not found")]
    ShareCodeNotFound,

    #[error("Pass not found")]
    PassNotFound,

    #[error("Pass expired")]
    Expired,

    #[error("Pass does not allow guests")]
    GuestsNotAllowed,

    #[error("Guest limit reached")]
    GuestLimitReached,

    #[error("Device not joined")]
    DeviceNotJoined,

    #[error("share code or pass id is required")]
    MissingIdentifier,

    #[error("Failed to create unique share code")]
    ShareCodeExhausted,

    #[error("Failed to generate random share code: {0}")]
    Entropy(String),
}

impl PassError {
    /// HTTP status for callers serving the ledger over a network.
    pub fn status_code(&self) -> u16 {
        match self {
            PassError::InvalidType(_) | PassError::MissingIdentifier => 400,
            PassError::GuestsNotAllowed | PassError::DeviceNotJoined => 403,
            PassError::ShareCodeNotFound | PassError::PassNotFound => 404,
            PassError::GuestLimitReached => 409,
            PassError::Expired => 410,
            PassError::ShareCodeExhausted | PassError::Entropy(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
