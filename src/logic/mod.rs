//! Logic Module - The Inference Pipeline & Its Contracts
//!
//! ## Architecture
//! - `measurement/` - Instrument measurement contract (types + validator)
//! - `instruments.rs` - Versioned instrument channel layout
//! - `environment.rs` - Environment taxonomy + classifier boundary
//! - `producers/` - Async producer boundary (fan-out, timeouts, cache)
//! - `normalize/` - Phase A: environment-baseline normalization
//! - `anomaly/` - Phase B: statistical anomaly detection
//! - `morphology/` - Phase C: shape analysis + geomorphology decision table
//! - `inference/` - Phase D: origin/activity probabilities, coverage
//! - `antipattern/` - Phase E: natural false-positive screening
//! - `strangeness.rs` - Explanatory strangeness assessment
//! - `output/` - Phase F/G: record assembly + notes generation
//! - `pipeline.rs` - Orchestration: request -> record
//! - `history.rs` - Historical context + known-site collaborators
//! - `persist.rs` - Append-only record sink
//! - `config.rs` - Thresholds; `error.rs` - error taxonomy

pub mod anomaly;
pub mod antipattern;
pub mod config;
pub mod environment;
pub mod error;
pub mod history;
pub mod inference;
pub mod instruments;
pub mod measurement;
pub mod morphology;
pub mod normalize;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod producers;
pub mod strangeness;
