//! Notes Generation
//!
//! Builds the human-readable notes string for the output record. Wording is
//! STRICTLY derived from numeric state. The hard rule: "anomaly detected"
//! phrasing is keyed off the anomaly score's relation to the detection
//! threshold and off nothing else. When the score sits at or near zero the
//! notes must say no anomaly is present, even when the morphology-driven
//! anthropic probability is moderate.

use crate::logic::anomaly::AnomalyResult;
use crate::logic::antipattern::AntiPatternRejection;
use crate::logic::config::PipelineConfig;
use crate::logic::inference::{AnthropicInferenceResult, CoverageReport};
use crate::logic::morphology::MorphologyResult;
use crate::logic::strangeness::{StrangenessLevel, StrangenessResult};

/// Combined anthropic probability at/above which the no-anomaly wording
/// mentions a moderate probability under uncertainty
const MODERATE_PROBABILITY: f32 = 0.30;

// ============================================================================
// BUILDER
// ============================================================================

pub fn build(
    anomaly: &AnomalyResult,
    morphology: &MorphologyResult,
    coverage: &CoverageReport,
    inference: &AnthropicInferenceResult,
    rejection: Option<&AntiPatternRejection>,
    strangeness: &StrangenessResult,
    combined_probability: f32,
    config: &PipelineConfig,
) -> String {
    let mut sentences = Vec::new();

    sentences.push(anomaly_sentence(anomaly, combined_probability, config));

    sentences.push(format!(
        "Morphology: symmetry {:.2}, planarity {:.2}, edge regularity {:.2}; hint {}.",
        morphology.symmetry,
        morphology.planarity,
        morphology.edge_regularity,
        morphology.geomorphology_hint
    ));

    if let Some(sig) = &morphology.special_signature {
        sentences.push(format!(
            "Special signature {} (probability {:.2}).",
            sig.name, sig.probability
        ));
    }

    sentences.push(format!(
        "Site classification {} (origin {:.2}, activity {:.2}); inference confidence {}.",
        inference.site_classification,
        inference.origin.value,
        inference.activity.value,
        inference.inference_confidence
    ));

    if coverage.effective < config.min_effective_coverage {
        sentences.push(format!(
            "Insufficient instrument coverage ({}/{} usable, effective {:.2}): estimate is best-effort.",
            coverage.instruments_measured, coverage.instruments_available, coverage.effective
        ));
    }

    if let Some(r) = rejection {
        sentences.push(format!(
            "Rejected as natural signature '{}' (confidence {:.2}, {}).",
            r.pattern_name, r.confidence, r.discard_type
        ));
    }

    if strangeness.level != StrangenessLevel::None {
        sentences.push(format!(
            "Explanatory strangeness {} ({:.2}): natural-process model does not account for the observed regularity.",
            strangeness.level, strangeness.score
        ));
    }

    sentences.join(" ")
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// The anomaly wording. Only the above-threshold branch may contain the
/// phrase "anomaly detected"; both other branches must avoid it entirely.
fn anomaly_sentence(
    anomaly: &AnomalyResult,
    combined_probability: f32,
    config: &PipelineConfig,
) -> String {
    if anomaly.dimensions_used == 0 {
        return "No usable instrument dimensions; anomaly state is indeterminate.".to_string();
    }

    if anomaly.score >= config.primary_detection_threshold {
        return format!(
            "Statistical anomaly detected (score {:.2}, {} outlier dimension(s)).",
            anomaly.score,
            anomaly.outlier_dimensions.len()
        );
    }

    if anomaly.score <= config.near_zero_band {
        if combined_probability >= MODERATE_PROBABILITY {
            return format!(
                "No statistical anomaly present; moderate anthropic-origin probability ({:.2}) under high epistemic uncertainty.",
                combined_probability
            );
        }
        return "No statistical anomaly present.".to_string();
    }

    format!(
        "Weak statistical signal below detection threshold (score {:.2}).",
        anomaly.score
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::anomaly::{StatisticalConfidence, ANOMALY_METHOD};

    fn anomaly_with(score: f32, dims: usize) -> AnomalyResult {
        AnomalyResult {
            score,
            outlier_dimensions: vec!["nightlights".to_string()],
            method: ANOMALY_METHOD.to_string(),
            confidence: StatisticalConfidence::Medium,
            dimensions_used: dims,
        }
    }

    #[test]
    fn test_zero_score_never_says_anomaly_detected() {
        let config = PipelineConfig::default();
        for combined in [0.0, 0.2, 0.35, 0.6] {
            let s = anomaly_sentence(&anomaly_with(0.0, 5), combined, &config);
            assert!(!s.contains("anomaly detected"), "offending wording: {s}");
        }
    }

    #[test]
    fn test_moderate_probability_without_anomaly_wording() {
        let s = anomaly_sentence(&anomaly_with(0.0, 5), 0.45, &PipelineConfig::default());
        assert!(s.starts_with("No statistical anomaly present"));
        assert!(s.contains("high epistemic uncertainty"));
    }

    #[test]
    fn test_above_threshold_states_detection() {
        let s = anomaly_sentence(&anomaly_with(0.7, 6), 0.5, &PipelineConfig::default());
        assert!(s.contains("Statistical anomaly detected"));
    }

    #[test]
    fn test_weak_signal_band() {
        let s = anomaly_sentence(&anomaly_with(0.3, 6), 0.2, &PipelineConfig::default());
        assert!(s.contains("below detection threshold"));
        assert!(!s.contains("anomaly detected"));
    }

    #[test]
    fn test_zero_dimensions_is_indeterminate() {
        let s = anomaly_sentence(&anomaly_with(0.0, 0), 0.0, &PipelineConfig::default());
        assert!(s.contains("indeterminate"));
        assert!(!s.contains("anomaly detected"));
    }
}
