//! Anthropic Inference Module - Phase D
//!
//! Two independently calibrated probabilities, each with its own interval:
//! - ORIGIN: "ever modified by humans" - driven by morphology. An ancient,
//!   fully weathered structure shows shape evidence without residual signal,
//!   so origin is never penalized by a missing anomaly.
//! - ACTIVITY: "current/recent human use" - driven by the anomaly score and
//!   disturbance-sensitive channels, and penalized when the anomaly is low.
//!
//! # Architecture
//! - `coverage.rs`: raw vs environment-weighted coverage
//! - `types.rs`: result types, the three separate confidence taxonomies

pub mod coverage;
pub mod types;

use crate::logic::anomaly::AnomalyResult;
use crate::logic::config::PipelineConfig;
use crate::logic::instruments::DISTURBANCE_CHANNELS;
use crate::logic::morphology::MorphologyResult;
use crate::logic::normalize::NormalizedFeatureSet;

pub use coverage::{compute as compute_coverage, CoverageReport};
pub use types::{
    AnthropicInferenceResult, InferenceConfidence, ProbabilityEstimate, SiteClassification,
    SystemConfidence,
};

// ============================================================================
// WEIGHTS (origin/activity component contributions)
// ============================================================================

const SYMMETRY_WEIGHT: f32 = 0.45;
const PLANARITY_WEIGHT: f32 = 0.35;
const EDGE_WEIGHT: f32 = 0.20;

/// Bonus when the decision table already leans anthropic
const ANTHROPIC_HINT_BONUS: f32 = 0.15;
/// Per artificial-pattern tag, capped
const TAG_BONUS: f32 = 0.03;
const TAG_BONUS_CAP: f32 = 0.09;

const ANOMALY_ACTIVITY_WEIGHT: f32 = 0.70;
const DISTURBANCE_ACTIVITY_WEIGHT: f32 = 0.30;
/// Multiplier applied to activity when the anomaly sits below the floor
const LOW_ANOMALY_ACTIVITY_PENALTY: f32 = 0.40;

/// Origin probability is capped: remote sensing alone never proves a site
const ORIGIN_CAP: f32 = 0.98;

// ============================================================================
// PHASE D
// ============================================================================

pub fn infer(
    features: &NormalizedFeatureSet,
    anomaly: &AnomalyResult,
    morphology: &MorphologyResult,
    coverage: &CoverageReport,
    config: &PipelineConfig,
) -> AnthropicInferenceResult {
    let mut reasoning = Vec::new();

    // --- Origin axis (morphology only) ---
    let mut origin_value = SYMMETRY_WEIGHT * morphology.symmetry
        + PLANARITY_WEIGHT * morphology.planarity
        + EDGE_WEIGHT * morphology.edge_regularity;
    reasoning.push(format!(
        "Origin base {:.2} from symmetry {:.2} / planarity {:.2} / edge regularity {:.2}",
        origin_value, morphology.symmetry, morphology.planarity, morphology.edge_regularity
    ));

    if morphology.geomorphology_hint.is_anthropic_leaning() {
        origin_value += ANTHROPIC_HINT_BONUS;
        reasoning.push(format!(
            "Geomorphology hint '{}' supports anthropic origin (+{:.2})",
            morphology.geomorphology_hint, ANTHROPIC_HINT_BONUS
        ));
    }

    let tag_bonus =
        (morphology.artificial_pattern_tags.len() as f32 * TAG_BONUS).min(TAG_BONUS_CAP);
    if tag_bonus > 0.0 {
        origin_value += tag_bonus;
        reasoning.push(format!(
            "{} artificial pattern tag(s) (+{:.2})",
            morphology.artificial_pattern_tags.len(),
            tag_bonus
        ));
    }
    origin_value = origin_value.clamp(0.0, ORIGIN_CAP);

    // --- Activity axis (anomaly + disturbance channels) ---
    let disturbance = disturbance_signal(features);
    let mut activity_value = ANOMALY_ACTIVITY_WEIGHT * anomaly.score
        + DISTURBANCE_ACTIVITY_WEIGHT * disturbance;
    reasoning.push(format!(
        "Activity base {:.2} from anomaly {:.2} and disturbance signal {:.2}",
        activity_value, anomaly.score, disturbance
    ));

    if anomaly.score < config.activity_anomaly_floor {
        activity_value *= LOW_ANOMALY_ACTIVITY_PENALTY;
        reasoning.push(format!(
            "Anomaly {:.2} below activity floor {:.2}: activity penalized",
            anomaly.score, config.activity_anomaly_floor
        ));
    }
    activity_value = activity_value.clamp(0.0, 1.0);

    // --- Intervals widen with poor effective coverage ---
    let coverage_widening = 0.30 * (1.0 - coverage.effective);
    let origin_half =
        0.08 + coverage_widening + if morphology.channels_used < 3 { 0.05 } else { 0.0 };
    let activity_half =
        0.08 + coverage_widening + if anomaly.dimensions_used < 3 { 0.05 } else { 0.0 };

    let origin = ProbabilityEstimate::new(origin_value, origin_half);
    let activity = ProbabilityEstimate::new(activity_value, activity_half);

    // --- Confidence (coverage-derived; separate from system confidence) ---
    let inference_confidence = derive_confidence(anomaly, coverage, config, &mut reasoning);

    // --- Site classification over the two axes ---
    let site_classification = classify_site(
        origin.value,
        activity.value,
        anomaly,
        coverage,
        config,
        &mut reasoning,
    );

    AnthropicInferenceResult {
        origin,
        activity,
        instruments_measured: coverage.instruments_measured,
        instruments_available: coverage.instruments_available,
        coverage_raw: coverage.raw,
        coverage_effective: coverage.effective,
        inference_confidence,
        system_confidence: SystemConfidence::High,
        reasoning,
        site_classification,
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// Mean positive deviation across the disturbance-sensitive channels,
/// squashed into [0,1]. Channels with no usable data contribute nothing.
fn disturbance_signal(features: &NormalizedFeatureSet) -> f32 {
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for name in DISTURBANCE_CHANNELS {
        if let Some(z) = features.get(name) {
            sum += (z.max(0.0) / 3.0).clamp(0.0, 1.0);
            n += 1;
        }
    }
    if n == 0 {
        0.0
    } else {
        (sum / n as f64) as f32
    }
}

fn derive_confidence(
    anomaly: &AnomalyResult,
    coverage: &CoverageReport,
    config: &PipelineConfig,
    reasoning: &mut Vec<String>,
) -> InferenceConfidence {
    if coverage.effective < config.min_effective_coverage {
        reasoning.push(format!(
            "Effective coverage {:.2} below minimum {:.2}: inference confidence forced low",
            coverage.effective, config.min_effective_coverage
        ));
        return InferenceConfidence::Low;
    }

    if coverage.effective >= 0.80 && anomaly.dimensions_used >= 6 {
        InferenceConfidence::High
    } else if coverage.effective >= 0.65 {
        InferenceConfidence::MediumHigh
    } else if coverage.effective >= 0.50 {
        InferenceConfidence::Medium
    } else {
        InferenceConfidence::Low
    }
}

fn classify_site(
    origin: f32,
    activity: f32,
    anomaly: &AnomalyResult,
    coverage: &CoverageReport,
    config: &PipelineConfig,
    reasoning: &mut Vec<String>,
) -> SiteClassification {
    if coverage.instruments_measured == 0 {
        reasoning.push("Zero usable instruments: classification is ambiguous".to_string());
        return SiteClassification::Ambiguous;
    }

    let anomaly_detected = anomaly.score >= config.primary_detection_threshold;

    let class = if origin >= 0.6 {
        if anomaly_detected && activity >= 0.35 {
            SiteClassification::ActiveSite
        } else if !anomaly_detected && activity <= 0.4 {
            // Shape evidence without residual signal: inactive archaeology,
            // the expected non-contradictory signature.
            SiteClassification::HistoricalStructure
        } else {
            SiteClassification::Ambiguous
        }
    } else if origin < 0.35 {
        if anomaly_detected {
            SiteClassification::NaturalAnomaly
        } else {
            SiteClassification::NaturalFormation
        }
    } else {
        SiteClassification::Ambiguous
    };

    reasoning.push(format!(
        "Site classification '{}' (origin {:.2}, activity {:.2}, anomaly {:.2})",
        class, origin, activity, anomaly.score
    ));
    class
}

// ============================================================================
// TESTS
// ============================================================================
