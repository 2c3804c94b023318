//! Error types for the HYPE core library.

use thiserror::Error;

/// Top-level error type for all HYPE operations.
#[derive(Error, Debug)]
pub enum HypeError {
    /// A like-threshold event key did not parse as a positive integer.
    #[error("Invalid like threshold key: {key:?} (must be a positive integer)")]
    InvalidThreshold {
        /// The offending event key.
        key: String,
    },

    /// An action failed registration-time validation.
    #[error("Invalid action {kind} for key {key:?}: {reason}")]
    InvalidAction {
        /// Action kind name.
        kind: &'static str,
        /// Event key the action was registered under.
        key: String,
        /// Why validation rejected it.
        reason: String,
    },

    /// A collaborator call behind [`crate::GameContext`] failed.
    #[error("Game backend error: {0}")]
    Backend(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, HypeError>;
