//! Error types for the valuation engine.
//!
//! The engine is built around deterministic fallbacks: delegated extraction,
//! aggregate market data, and comparable pools all degrade silently
//! (see the module docs of `extraction`, `market`, `comparables`).
//! `InvalidInput` is the only variant that surfaces to callers.

use thiserror::Error;

/// Result type alias using the engine error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the valuation engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request (the only caller-visible failure)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External service error (delegated extraction, aggregate queries)
    #[error("External service error: {0}")]
    External(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error may be shown to the caller as a request failure.
    ///
    /// Everything except invalid input has a defined fallback and should
    /// never propagate out of the engine.
    pub fn is_caller_visible(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
