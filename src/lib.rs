//! AnthroScan Core - Anthropogenic Signature Analysis
//!
//! Multi-phase inference pipeline that turns heterogeneous remote-sensing
//! measurements over a geographic region into a calibrated, auditable
//! judgment about anthropogenic modification: transparent, deterministic
//! statistics end to end, no learned models.

pub mod constants;
pub mod logic;

pub use logic::config::PipelineConfig;
pub use logic::error::AnalysisError;
pub use logic::output::ScientificOutputRecord;
pub use logic::pipeline::{AnalysisEngine, AnalysisOutcome, AnalysisRequest};

/// Initialize env_logger once. Safe to call repeatedly (later calls no-op).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}
