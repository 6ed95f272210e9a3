//! Error types for echoslice
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Each variant maps to a distinct failure class so an HTTP
//! boundary can translate them into distinct status codes.

use thiserror::Error;

/// Main error type for the echoslice audio core
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced recording or audio file path does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-supplied parameter failed validation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Underlying audio file is corrupt or uses an unsupported codec
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Sample-rate conversion failed; callers may select a fallback rate
    #[error("Resample error: {0}")]
    Resample(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Broken internal invariant in the numeric pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using the echoslice Error
pub type Result<T> = std::result::Result<T, Error>;
