//! Centralized error handling for the depthframe service
//!
//! This module unifies error types across the application layers: the
//! transform pipeline, the frame store, the ingestion pipeline, and
//! configuration loading.
//!
//! A cache miss is deliberately NOT an error anywhere in this crate; the
//! cache layer models it as `Option::None` control flow.

pub mod types;

pub use types::*;

/// Convenience type alias for transform pipeline Results
pub type TransformResult<T> = Result<T, TransformError>;

/// Convenience type alias for frame store Results
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for ingestion Results
pub type IngestResult<T> = Result<T, IngestError>;
