//! Explanatory Strangeness
//!
//! Flags the case where the anomaly score is near zero but morphology is
//! strongly regular under high epistemic uncertainty: an honest "the
//! natural-process model is insufficient to explain this regularity"
//! statement, distinct from "anomaly found".
//!
//! Hard rule: never activates once the anomaly score exceeds the primary
//! detection threshold - at that point the anomaly channel already carries
//! the signal and strangeness would only muddy the record.

use serde::{Deserialize, Serialize};

use crate::logic::anomaly::AnomalyResult;
use crate::logic::config::PipelineConfig;
use crate::logic::inference::CoverageReport;
use crate::logic::morphology::MorphologyResult;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Morphological regularity below this never registers as strange
const REGULARITY_FLOOR: f32 = 0.55;

const LEVEL_LOW: f32 = 0.15;
const LEVEL_MEDIUM: f32 = 0.30;
const LEVEL_HIGH: f32 = 0.45;
const LEVEL_VERY_HIGH: f32 = 0.60;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrangenessLevel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl StrangenessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrangenessLevel::None => "none",
            StrangenessLevel::Low => "low",
            StrangenessLevel::Medium => "medium",
            StrangenessLevel::High => "high",
            StrangenessLevel::VeryHigh => "very_high",
        }
    }

    fn from_score(score: f32) -> Self {
        if score >= LEVEL_VERY_HIGH {
            StrangenessLevel::VeryHigh
        } else if score >= LEVEL_HIGH {
            StrangenessLevel::High
        } else if score >= LEVEL_MEDIUM {
            StrangenessLevel::Medium
        } else if score >= LEVEL_LOW {
            StrangenessLevel::Low
        } else {
            StrangenessLevel::None
        }
    }
}

impl std::fmt::Display for StrangenessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrangenessResult {
    pub level: StrangenessLevel,
    pub score: f32,
    pub reasons: Vec<String>,
}

impl StrangenessResult {
    fn none() -> Self {
        Self { level: StrangenessLevel::None, score: 0.0, reasons: Vec::new() }
    }
}

// ============================================================================
// ASSESSMENT
// ============================================================================

/// score = regularity * epistemic uncertainty * (1 - anomaly/threshold)
///
/// Regularity is the mean of symmetry and planarity. Uncertainty grows with
/// missing coverage and missing shape channels. The last factor fades
/// strangeness out as the anomaly channel picks the signal up itself.
pub fn assess(
    anomaly: &AnomalyResult,
    morphology: &MorphologyResult,
    coverage: &CoverageReport,
    config: &PipelineConfig,
) -> StrangenessResult {
    // Hard guard, unconditional on morphology
    if anomaly.score > config.primary_detection_threshold {
        return StrangenessResult::none();
    }

    let regularity = (morphology.symmetry + morphology.planarity) / 2.0;
    if regularity < REGULARITY_FLOOR {
        return StrangenessResult::none();
    }

    let coverage_uncertainty = 1.0 - coverage.effective;
    let channel_uncertainty = if morphology.channels_used < 3 { 0.3 } else { 0.0 };
    let uncertainty = (coverage_uncertainty + channel_uncertainty).clamp(0.0, 1.0);

    let anomaly_fade =
        1.0 - (anomaly.score / config.primary_detection_threshold).clamp(0.0, 1.0);

    let score = (regularity * uncertainty * anomaly_fade).clamp(0.0, 1.0);
    let level = StrangenessLevel::from_score(score);

    let mut reasons = Vec::new();
    if level != StrangenessLevel::None {
        reasons.push(format!(
            "Morphological regularity {:.2} without supporting statistical anomaly ({:.2})",
            regularity, anomaly.score
        ));
        reasons.push(format!(
            "Epistemic uncertainty {:.2} (effective coverage {:.2}, {} shape channels)",
            uncertainty, coverage.effective, morphology.channels_used
        ));
        reasons.push(
            "Natural-process model insufficient to explain observed regularity".to_string(),
        );
    }

    StrangenessResult { level, score, reasons }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::anomaly::{AnomalyResult, StatisticalConfidence, ANOMALY_METHOD};
    use crate::logic::morphology::{GeomorphologyHint, MorphologyResult};

    fn anomaly_with(score: f32) -> AnomalyResult {
        AnomalyResult {
            score,
            outlier_dimensions: vec![],
            method: ANOMALY_METHOD.to_string(),
            confidence: StatisticalConfidence::Medium,
            dimensions_used: 4,
        }
    }

    fn morphology_with(symmetry: f32, planarity: f32, channels: usize) -> MorphologyResult {
        MorphologyResult {
            symmetry,
            edge_regularity: 0.6,
            planarity,
            artificial_pattern_tags: vec![],
            geomorphology_hint: GeomorphologyHint::GeneralTerrain,
            matched_rule: "test".to_string(),
            special_signature: None,
            channels_used: channels,
        }
    }

    fn coverage_with(effective: f32) -> CoverageReport {
        CoverageReport {
            instruments_measured: 5,
            instruments_available: 10,
            raw: 0.5,
            effective,
        }
    }

    #[test]
    fn test_regular_but_not_anomalous_under_uncertainty() {
        // High regularity, zero anomaly, missing desert channel
        let r = assess(
            &anomaly_with(0.0),
            &morphology_with(0.85, 0.85, 2),
            &coverage_with(0.45),
            &PipelineConfig::default(),
        );
        assert!(r.level >= StrangenessLevel::Medium);
        assert!(r.score > 0.0);
        assert!(!r.reasons.is_empty());
    }

    #[test]
    fn test_never_activates_above_detection_threshold() {
        // Any morphology, even maximal regularity with zero coverage
        let r = assess(
            &anomaly_with(0.51),
            &morphology_with(1.0, 1.0, 1),
            &coverage_with(0.0),
            &PipelineConfig::default(),
        );
        assert_eq!(r.level, StrangenessLevel::None);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn test_irregular_morphology_is_not_strange() {
        let r = assess(
            &anomaly_with(0.0),
            &morphology_with(0.3, 0.3, 4),
            &coverage_with(0.2),
            &PipelineConfig::default(),
        );
        assert_eq!(r.level, StrangenessLevel::None);
    }

    #[test]
    fn test_fades_as_anomaly_grows() {
        let quiet = assess(
            &anomaly_with(0.05),
            &morphology_with(0.85, 0.85, 2),
            &coverage_with(0.45),
            &PipelineConfig::default(),
        );
        let louder = assess(
            &anomaly_with(0.40),
            &morphology_with(0.85, 0.85, 2),
            &coverage_with(0.45),
            &PipelineConfig::default(),
        );
        assert!(louder.score < quiet.score);
    }

    #[test]
    fn test_good_coverage_dampens_strangeness() {
        let full = assess(
            &anomaly_with(0.0),
            &morphology_with(0.85, 0.85, 4),
            &coverage_with(1.0),
            &PipelineConfig::default(),
        );
        assert_eq!(full.level, StrangenessLevel::None);
    }
}
