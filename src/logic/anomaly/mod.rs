//! Anomaly Detection Module - Phase B
//!
//! Pure function of the normalized feature set. Deliberately blind to
//! morphology and to known-site data: "statistically unusual" stays cleanly
//! separated from "geometrically suggestive" and "historically known".
//!
//! `score == 0.0` is a hard semantic fact - Phase F text generation must
//! never contradict it.

use serde::{Deserialize, Serialize};

use crate::logic::environment::EnvironmentType;
use crate::logic::normalize::NormalizedFeatureSet;

/// Method tag carried by every result of this detector
pub const ANOMALY_METHOD: &str = "weighted_zscore_aggregate_v1";

// ============================================================================
// OUTLIER CALIBRATION
// ============================================================================

/// Deviation threshold (in weighted z units) beyond which a dimension counts
/// as an outlier. Environment-calibrated: noisy environments need more slack.
pub fn outlier_threshold(env: EnvironmentType) -> f64 {
    match env {
        // Aeolian surfaces are intrinsically variable
        EnvironmentType::Desert => 2.2,
        EnvironmentType::Coastal => 2.2,
        // Very homogeneous background: deviations mean more
        EnvironmentType::IceSheet => 1.6,
        _ => 2.0,
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Statistical confidence of the anomaly estimate. Driven purely by how many
/// dimensions were available - distinct from inference confidence (Phase D)
/// and from system confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticalConfidence {
    Low,
    Medium,
    High,
}

impl StatisticalConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticalConfidence::Low => "low",
            StatisticalConfidence::Medium => "medium",
            StatisticalConfidence::High => "high",
        }
    }

    fn from_dimensions(dims: usize) -> Self {
        match dims {
            0..=2 => StatisticalConfidence::Low,
            3..=5 => StatisticalConfidence::Medium,
            _ => StatisticalConfidence::High,
        }
    }
}

/// Output of Phase B
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Aggregate anomaly score in [0,1)
    pub score: f32,
    /// Dimensions beyond the environment-calibrated deviation threshold
    pub outlier_dimensions: Vec<String>,
    pub method: String,
    pub confidence: StatisticalConfidence,
    /// How many feature dimensions were available. Zero means "insufficient
    /// coverage", NOT "zero anomaly" - downstream must check this.
    pub dimensions_used: usize,
}

// ============================================================================
// DETECTOR
// ============================================================================

/// Detect statistical anomaly in the feature set.
///
/// Score is the mean absolute weighted deviation squashed into [0,1):
/// `m / (m + 2)`. Exactly 0.0 iff every dimension sits on its baseline
/// (or no dimensions exist, in which case `dimensions_used == 0`).
pub fn detect(features: &NormalizedFeatureSet) -> AnomalyResult {
    let n = features.len();

    if n == 0 {
        return AnomalyResult {
            score: 0.0,
            outlier_dimensions: Vec::new(),
            method: ANOMALY_METHOD.to_string(),
            confidence: StatisticalConfidence::Low,
            dimensions_used: 0,
        };
    }

    let threshold = outlier_threshold(features.environment);

    let mut sum_abs = 0.0f64;
    let mut outliers = Vec::new();
    for (name, z) in &features.features {
        sum_abs += z.abs();
        if z.abs() >= threshold {
            outliers.push(name.clone());
        }
    }

    let mean_abs = sum_abs / n as f64;
    let score = (mean_abs / (mean_abs + 2.0)) as f32;

    AnomalyResult {
        score,
        outlier_dimensions: outliers,
        method: ANOMALY_METHOD.to_string(),
        confidence: StatisticalConfidence::from_dimensions(n),
        dimensions_used: n,
    }
}

// ============================================================================
// TESTS
// ============================================================================
