//! Anthropic Inference Types
//!
//! Core types for Phase D. NO inference logic - only data structures.
//!
//! Three distinct "confidence" meanings live in this system and are NEVER
//! coalesced: statistical confidence (Phase B), inference confidence (here,
//! coverage + signal support), and system confidence (computational
//! determinism - always high for this deterministic pipeline).

use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIDENCE TAXONOMIES
// ============================================================================

/// How well-supported the inference is (coverage + signal strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceConfidence {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl InferenceConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceConfidence::Low => "low",
            InferenceConfidence::Medium => "medium",
            InferenceConfidence::MediumHigh => "medium_high",
            InferenceConfidence::High => "high",
        }
    }
}

impl std::fmt::Display for InferenceConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computational reproducibility of the pipeline itself. The pipeline is
/// fully deterministic, so this is always `High`; it exists as a separate
/// field so it can never be confused with inference confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemConfidence {
    High,
}

impl SystemConfidence {
    pub fn as_str(&self) -> &'static str {
        "high"
    }
}

// ============================================================================
// SITE CLASSIFICATION
// ============================================================================

/// Combined origin/activity verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteClassification {
    /// High origin, low activity, low anomaly: the expected signature of
    /// inactive archaeology. Not a contradiction.
    HistoricalStructure,
    /// High origin, high activity, high anomaly
    ActiveSite,
    NaturalFormation,
    /// Statistical anomaly without morphological support
    NaturalAnomaly,
    Ambiguous,
}

impl SiteClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteClassification::HistoricalStructure => "historical_structure",
            SiteClassification::ActiveSite => "active_site",
            SiteClassification::NaturalFormation => "natural_formation",
            SiteClassification::NaturalAnomaly => "natural_anomaly",
            SiteClassification::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for SiteClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PROBABILITY ESTIMATE
// ============================================================================

/// A probability with its confidence interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub value: f32,
    pub interval_low: f32,
    pub interval_high: f32,
}

impl ProbabilityEstimate {
    /// Build from a point value and interval half-width, clamped to [0,1]
    pub fn new(value: f32, half_width: f32) -> Self {
        let value = value.clamp(0.0, 1.0);
        Self {
            value,
            interval_low: (value - half_width).max(0.0),
            interval_high: (value + half_width).min(1.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.interval_high - self.interval_low
    }
}

// ============================================================================
// INFERENCE RESULT
// ============================================================================

/// Output of Phase D. Created once per analysis; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicInferenceResult {
    /// "Ever modified by humans" - morphology-driven, never penalized by
    /// absence of a current anomaly
    pub origin: ProbabilityEstimate,
    /// "Current/recent human use" - anomaly-driven, penalized when the
    /// anomaly score is low
    pub activity: ProbabilityEstimate,
    pub instruments_measured: usize,
    pub instruments_available: usize,
    pub coverage_raw: f32,
    pub coverage_effective: f32,
    pub inference_confidence: InferenceConfidence,
    pub system_confidence: SystemConfidence,
    pub reasoning: Vec<String>,
    pub site_classification: SiteClassification,
}

// ============================================================================
// TESTS
// ============================================================================
