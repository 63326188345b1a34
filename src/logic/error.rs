//! Error Taxonomy
//!
//! Only malformed requests are hard errors. Everything else in the taxonomy
//! (producer unavailability, insufficient coverage, contract violations,
//! anti-pattern rejection) is recovered locally and expressed in the record.

use thiserror::Error;

/// Pipeline-level errors. The pipeline always returns a best-effort record
/// except for `MalformedRequest`, which is rejected before any phase runs.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Request failed geometric validation (e.g. min bound > max bound)
    #[error("Malformed analysis request: {0}")]
    MalformedRequest(String),
}

/// Persistence boundary errors. Never fatal to an analysis: the record is
/// still returned and the failure is logged.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink rejected record: {0}")]
    Rejected(String),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
