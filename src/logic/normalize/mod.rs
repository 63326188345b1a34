//! Normalization Module - Phase A
//!
//! Turns raw per-instrument measurements into dimensionless, comparable
//! features: subtract the environment (or global) baseline mean, divide by
//! baseline spread, multiply by the environment's discriminative weight.
//!
//! # Architecture
//! - `baseline.rs`: calibration tables (mean/spread per env+instrument)
//! - `weights.rs`: per-environment discriminative weights
//!
//! # Coverage rule
//! Only OK/DERIVED measurements enter the feature set. Zero usable
//! instruments produce an EMPTY set, which downstream phases must read as
//! "insufficient coverage", never as "zero anomaly".

pub mod baseline;
pub mod weights;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::environment::{EnvironmentClassification, EnvironmentType};
use crate::logic::history::HistoricalContextSummary;
use crate::logic::instruments::{layout_hash, INSTRUMENT_VERSION};
use crate::logic::measurement::Measurement;

pub use baseline::{BaselineEntry, BaselineTable};
pub use weights::environment_weight;

/// Method tag carried by every feature set produced by this module
pub const NORMALIZATION_METHOD: &str = "env_baseline_zscore_v1";

// ============================================================================
// NORMALIZED FEATURE SET
// ============================================================================

/// Output of Phase A. Created once per analysis; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedFeatureSet {
    pub candidate_id: String,
    /// Instrument layout contract (see `instruments.rs`)
    pub feature_version: u8,
    pub layout_hash: u32,
    /// Weighted z-scores, keyed by instrument name (BTreeMap: deterministic)
    pub features: BTreeMap<String, f64>,
    /// Raw values of the usable measurements (snapshot for Phase C)
    pub raw: BTreeMap<String, f64>,
    pub method: String,
    pub environment: EnvironmentType,
    pub historical_context: Option<HistoricalContextSummary>,
}

impl NormalizedFeatureSet {
    /// Empty set: zero usable instruments. Downstream reads this as
    /// insufficient coverage.
    pub fn empty(candidate_id: &str, environment: EnvironmentType) -> Self {
        Self {
            candidate_id: candidate_id.to_string(),
            feature_version: INSTRUMENT_VERSION,
            layout_hash: layout_hash(),
            features: BTreeMap::new(),
            raw: BTreeMap::new(),
            method: NORMALIZATION_METHOD.to_string(),
            environment,
            historical_context: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Weighted z-score of a channel, if usable
    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.features.get(instrument).copied()
    }

    /// Raw value of a channel, if usable
    pub fn raw_value(&self, instrument: &str) -> Option<f64> {
        self.raw.get(instrument).copied()
    }
}

// ============================================================================
// PHASE A
// ============================================================================

/// Normalize raw measurements into the comparable feature set.
///
/// Measurements whose status is not OK/DERIVED (or whose value is missing /
/// non-finite) contribute to coverage loss, not to the feature vector.
pub fn normalize(
    candidate_id: &str,
    measurements: &BTreeMap<String, Measurement>,
    env: &EnvironmentClassification,
    table: &BaselineTable,
    historical_context: Option<HistoricalContextSummary>,
) -> NormalizedFeatureSet {
    let mut set = NormalizedFeatureSet::empty(candidate_id, env.environment_type);
    set.historical_context = historical_context;

    for (name, m) in measurements {
        if !m.is_usable() {
            continue;
        }
        let value = match m.value {
            Some(v) if v.is_finite() => v,
            _ => continue,
        };

        let entry = match table.lookup(env.environment_type, name) {
            Some(e) if e.spread > 0.0 => e,
            _ => {
                log::debug!("No usable baseline for '{name}' in {}; channel skipped", env.environment_type);
                continue;
            }
        };

        let z = (value - entry.mean) / entry.spread;
        let weight = environment_weight(env.environment_type, name);

        set.raw.insert(name.clone(), value);
        set.features.insert(name.clone(), z * weight);
    }

    if set.is_empty() {
        log::warn!(
            "Candidate '{candidate_id}': zero usable instruments in {} - empty feature set",
            env.environment_type
        );
    }

    set
}

// ============================================================================
// TESTS
// ============================================================================
