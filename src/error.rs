//! Error types for Serenade operations.
//!
//! This module defines [`SerenadeError`], the primary error type used
//! throughout the application, [`TransportError`] for the remote submission
//! call, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration faults are the only errors that reach the user, and only
//!   at boot
//! - Transport failures are logged and swallowed by the submission pipeline
//! - Contract violations (unknown screens) panic instead of returning errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Serenade operations.
#[derive(Debug, Error)]
pub enum SerenadeError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration document.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Remote configuration could not be fetched.
    #[error("Failed to fetch config from {source_url}: {message}")]
    ConfigFetchFailed { source_url: String, message: String },

    /// Remote submission failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of the remote submission call.
///
/// Never shown to the user; the pipeline logs it and moves on.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-success status.
    #[error("submission endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request could not be built or sent.
    #[error("submission request failed: {0}")]
    Request(String),

    /// The background worker died before reporting a result.
    #[error("submission worker failed: {0}")]
    Worker(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

/// Result type alias for Serenade operations.
pub type Result<T> = std::result::Result<T, SerenadeError>;
