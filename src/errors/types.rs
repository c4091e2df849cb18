//! Error type definitions for the depthframe service
//!
//! This module defines all error types used throughout the application,
//! one enum per layer (transform, store, ingestion, configuration). The
//! binary edge folds them into `anyhow` for reporting.

use thiserror::Error;

/// Errors from the row transformation pipeline (resize, colorize, encode)
#[derive(Error, Debug)]
pub enum TransformError {
    /// A data row whose shape does not match the declared source width.
    /// Recoverable: the ingestion pipeline counts it and moves on.
    #[error("Malformed row: expected {expected} samples, got {actual}")]
    MalformedRow { expected: usize, actual: usize },

    /// Zero or otherwise unusable raster dimensions. A caller bug, fatal
    /// to the call and never retried.
    #[error("Invalid dimension: {message}")]
    InvalidDimension { message: String },

    /// PNG encoding failures
    #[error("Raster encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl TransformError {
    pub fn invalid_dimension(message: impl Into<String>) -> Self {
        Self::InvalidDimension {
            message: message.into(),
        }
    }
}

/// Errors surfaced by `FrameStore` implementations
///
/// The store is fatal-or-nothing from the core's point of view: a failed
/// read or write aborts the enclosing operation with the phase and key
/// context the caller needs for its own retry decision.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not complete the operation
    #[error("Store unavailable during {phase}: {message}")]
    Unavailable { phase: &'static str, message: String },
}

impl StoreError {
    pub fn unavailable(phase: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            phase,
            message: source.to_string(),
        }
    }
}

/// Errors that abort an ingestion run outright
///
/// Per-row parse and transform failures are NOT represented here; the
/// pipeline absorbs those into the run report and keeps going.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source file could not be opened or read
    #[error("Source read failed: {0}")]
    Source(#[from] std::io::Error),

    /// The CSV stream itself could not be decoded
    #[error("CSV decode failed: {0}")]
    Csv(#[from] csv::Error),

    /// The header row does not describe the expected scanline shape
    #[error(
        "Schema mismatch: expected 'depth' plus {expected} sample columns, found {actual} columns"
    )]
    SchemaMismatch { expected: usize, actual: usize },

    /// The frame store rejected a write; the run is aborted
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file I/O failures
    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse failures
    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failures while writing the default configuration file
    #[error("Configuration serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Semantically invalid configuration values
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
