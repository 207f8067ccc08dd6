//! Error types for capgate.
//!
//! Resolution and sanitation never fail: malformed input narrows to an empty
//! or false default. Errors are reserved for collaborator I/O and for
//! configuration that cannot be parsed.

use thiserror::Error;

/// The unified error type for capgate crates.
#[derive(Debug, Error)]
pub enum CapgateError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A settings or permission store could not complete a read or write.
    #[error("store error: {reason}")]
    StoreError { reason: String },

    /// A persisted snapshot could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    SerializationError { reason: String },
}

/// Convenience alias used throughout the capgate crates.
pub type CapgateResult<T> = Result<T, CapgateError>;
