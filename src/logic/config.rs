//! Pipeline Configuration & Thresholds
//!
//! Defines the thresholds the phases key off. NO phase logic here - only
//! constants and the configurable struct. Calibration values (baselines,
//! weights) live in `normalize/`; these are the decision thresholds.

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS (Constants - defaults for PipelineConfig)
// ============================================================================

/// Anomaly score at/above which an anomaly is considered detected
pub const PRIMARY_DETECTION_THRESHOLD: f32 = 0.5;

/// Anomaly scores at/below this band are reported as "no anomaly"
pub const NEAR_ZERO_BAND: f32 = 0.05;

/// Effective coverage below this forces inference confidence down
pub const MIN_EFFECTIVE_COVERAGE: f32 = 0.4;

/// Minimum signature match confidence for an anti-pattern rejection
pub const ANTIPATTERN_CONFIDENCE_MIN: f32 = 0.6;

/// Anomaly below this floor triggers the activity-probability penalty
pub const ACTIVITY_ANOMALY_FLOOR: f32 = 0.15;

// ============================================================================
// PRODUCER BOUNDARY
// ============================================================================

/// Per-producer timeout (milliseconds)
pub const DEFAULT_PRODUCER_TIMEOUT_MS: u64 = 8_000;

/// Bounded retry budget at the producer boundary (invisible to the pipeline)
pub const DEFAULT_PRODUCER_RETRIES: u32 = 1;

// ============================================================================
// COMBINED ANTHROPIC PROBABILITY
// ============================================================================

/// Origin share of the combined anthropic probability; activity carries the
/// remainder. Origin is weighted higher: a record about signs of modification
/// should not be dominated by transient activity.
pub const COMBINED_ORIGIN_SHARE: f32 = 0.55;

/// The single blend of origin and activity probability used everywhere a
/// combined anthropic probability is needed (record assembly, anti-pattern
/// screening).
pub fn combined_anthropic_probability(origin: f32, activity: f32) -> f32 {
    (COMBINED_ORIGIN_SHARE * origin + (1.0 - COMBINED_ORIGIN_SHARE) * activity).clamp(0.0, 1.0)
}

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

/// Pipeline thresholds (configurable per deployment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Anomaly score at/above which "anomaly detected" wording is allowed
    pub primary_detection_threshold: f32,
    /// At/below this, notes must state that no anomaly is present
    pub near_zero_band: f32,
    /// Below this effective coverage, inference confidence is never high
    pub min_effective_coverage: f32,
    /// Minimum match confidence for Phase E rejection
    pub antipattern_confidence_min: f32,
    /// Anomaly floor under which activity probability is penalized
    pub activity_anomaly_floor: f32,
    /// Per-producer timeout in milliseconds
    pub producer_timeout_ms: u64,
    /// Bounded producer retry budget
    pub producer_retries: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_detection_threshold: PRIMARY_DETECTION_THRESHOLD,
            near_zero_band: NEAR_ZERO_BAND,
            min_effective_coverage: MIN_EFFECTIVE_COVERAGE,
            antipattern_confidence_min: ANTIPATTERN_CONFIDENCE_MIN,
            activity_anomaly_floor: ACTIVITY_ANOMALY_FLOOR,
            producer_timeout_ms: DEFAULT_PRODUCER_TIMEOUT_MS,
            producer_retries: DEFAULT_PRODUCER_RETRIES,
        }
    }
}

impl PipelineConfig {
    /// Defaults with deployment-level environment overrides applied
    /// (`ANTHROSCAN_PRODUCER_TIMEOUT_MS`).
    pub fn from_env() -> Self {
        Self {
            producer_timeout_ms: crate::constants::get_producer_timeout_ms(),
            ..Default::default()
        }
    }

    /// High sensitivity - lower detection threshold, more candidates surface
    pub fn high_sensitivity() -> Self {
        Self {
            primary_detection_threshold: 0.4,
            antipattern_confidence_min: 0.7,
            ..Default::default()
        }
    }

    /// Low sensitivity - higher thresholds, fewer candidates surface
    pub fn low_sensitivity() -> Self {
        Self {
            primary_detection_threshold: 0.6,
            antipattern_confidence_min: 0.5,
            ..Default::default()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
