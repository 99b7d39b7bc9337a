//! # Error Types
//!
//! Recoverable errors. Only configuration can fail at runtime; misuse of
//! the storage API is a contract violation and panics instead.

use thiserror::Error;

/// Errors that can occur while preparing a world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecsError {
    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible operations.
pub type SecsResult<T> = Result<T, SecsError>;
