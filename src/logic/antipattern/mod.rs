//! Anti-Pattern Screening Module - Phase E
//!
//! Matches the combined evidence against curated natural false-positive
//! signatures (dune fields, glacial moraines, volcanic cones). A sufficiently
//! confident match produces a rejection record that downstream text must
//! honor.
//!
//! Rejections carry a discard taxonomy: `discard_operational` for
//! analytically uninteresting matches, `archive_scientific_negative` when the
//! baseline-profile match is strong or nearby prior analyses corroborate the
//! same pattern - a labeled negative is worth keeping.
//!
//! # Architecture
//! - `signatures.rs`: the curated (hint, environment) signature table

pub mod signatures;

use serde::{Deserialize, Serialize};

use crate::logic::config::{combined_anthropic_probability, PipelineConfig};
use crate::logic::inference::AnthropicInferenceResult;
use crate::logic::morphology::MorphologyResult;
use crate::logic::normalize::NormalizedFeatureSet;

pub use signatures::{matching_signature, AntiPatternSignature, SIGNATURES};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Combined anthropic probability at/above which a rejection is withheld:
/// confident anthropic evidence overrides a landform match
const ANTHROPIC_OVERRIDE: f32 = 0.40;

/// Baseline-profile match at/above which a rejection is archived
const ARCHIVE_BASELINE_MATCH: f32 = 0.70;

/// Prior corroborating rejections at/above which a rejection is archived
const ARCHIVE_CORROBORATION_MIN: usize = 2;

// ============================================================================
// DISCARD TAXONOMY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardType {
    None,
    /// Analytically uninteresting
    DiscardOperational,
    /// Worth retaining as a labeled negative / anti-pattern reference
    ArchiveScientificNegative,
}

impl DiscardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardType::None => "none",
            DiscardType::DiscardOperational => "discard_operational",
            DiscardType::ArchiveScientificNegative => "archive_scientific_negative",
        }
    }
}

impl std::fmt::Display for DiscardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// REJECTION RECORD
// ============================================================================

/// Output of Phase E when a natural signature explains the evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiPatternRejection {
    pub pattern_name: String,
    /// Match confidence in [0,1]
    pub confidence: f32,
    pub discard_type: DiscardType,
    /// How closely the feature set sits on the environment baseline
    pub baseline_profile_match: f32,
    /// Nearby prior analyses rejected with the same pattern
    pub corroborating_priors: usize,
    pub reasons: Vec<String>,
}

// ============================================================================
// PHASE E
// ============================================================================

/// Screen the combined evidence against the natural-signature table.
///
/// Returns `None` when no signature matches confidently enough, or when the
/// anthropic probabilities are too strong to dismiss.
pub fn screen(
    features: &NormalizedFeatureSet,
    morphology: &MorphologyResult,
    inference: &AnthropicInferenceResult,
    config: &PipelineConfig,
) -> Option<AntiPatternRejection> {
    let signature = matching_signature(morphology.geomorphology_hint, features.environment)?;

    let combined =
        combined_anthropic_probability(inference.origin.value, inference.activity.value);
    if combined >= ANTHROPIC_OVERRIDE {
        log::debug!(
            "Anti-pattern '{}' matched but combined anthropic probability {:.2} overrides",
            signature.name,
            combined
        );
        return None;
    }

    let baseline_profile_match = baseline_profile_match(features);
    let corroborating_priors = features
        .historical_context
        .as_ref()
        .map(|h| h.corroborations(signature.name))
        .unwrap_or(0);

    let corroboration_bonus = if corroborating_priors > 0 { 0.10 } else { 0.0 };
    let confidence =
        (0.50 + 0.40 * baseline_profile_match + corroboration_bonus).clamp(0.0, 0.95);

    if confidence < config.antipattern_confidence_min {
        return None;
    }

    let mut reasons = vec![format!(
        "Morphology hint '{}' matches natural signature '{}'",
        morphology.geomorphology_hint, signature.name
    )];
    reasons.push(format!(
        "Combined anthropic probability {:.2} below override threshold {:.2}",
        combined, ANTHROPIC_OVERRIDE
    ));

    let discard_type = if baseline_profile_match >= ARCHIVE_BASELINE_MATCH
        || corroborating_priors >= ARCHIVE_CORROBORATION_MIN
    {
        reasons.push(format!(
            "Strong baseline-profile match {:.2} ({} corroborating prior rejection(s)): archived as labeled negative",
            baseline_profile_match, corroborating_priors
        ));
        DiscardType::ArchiveScientificNegative
    } else {
        reasons.push("Weak baseline corroboration: operational discard".to_string());
        DiscardType::DiscardOperational
    };

    log::info!(
        "Candidate '{}' rejected as '{}' (confidence {:.2}, {})",
        features.candidate_id,
        signature.name,
        confidence,
        discard_type
    );

    Some(AntiPatternRejection {
        pattern_name: signature.name.to_string(),
        confidence,
        discard_type,
        baseline_profile_match,
        corroborating_priors,
        reasons,
    })
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// 1.0 when every dimension sits exactly on its environment baseline,
/// falling toward 0.0 as mean absolute deviation reaches 2 weighted z units.
fn baseline_profile_match(features: &NormalizedFeatureSet) -> f32 {
    if features.is_empty() {
        return 0.0;
    }
    let mean_abs: f64 =
        features.features.values().map(|z| z.abs()).sum::<f64>() / features.len() as f64;
    (1.0 - (mean_abs / 2.0).clamp(0.0, 1.0)) as f32
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::environment::EnvironmentType;
    use crate::logic::history::HistoricalContextSummary;
    use crate::logic::inference::{
        InferenceConfidence, ProbabilityEstimate, SiteClassification, SystemConfidence,
    };
    use crate::logic::morphology::GeomorphologyHint;

    fn features_near_baseline(env: EnvironmentType, deviation: f64) -> NormalizedFeatureSet {
        let mut s = NormalizedFeatureSet::empty("c1", env);
        for name in ["sar_backscatter", "sar_coherence", "elevation_roughness"] {
            s.features.insert(name.to_string(), deviation);
            s.raw.insert(name.to_string(), deviation);
        }
        s
    }

    fn morphology_with_hint(hint: GeomorphologyHint) -> MorphologyResult {
        MorphologyResult {
            symmetry: 0.30,
            edge_regularity: 0.55,
            planarity: 0.40,
            artificial_pattern_tags: vec![],
            geomorphology_hint: hint,
            matched_rule: "test".to_string(),
            special_signature: None,
            channels_used: 3,
        }
    }

    fn inference_with(origin: f32, activity: f32) -> AnthropicInferenceResult {
        AnthropicInferenceResult {
            origin: ProbabilityEstimate::new(origin, 0.1),
            activity: ProbabilityEstimate::new(activity, 0.1),
            instruments_measured: 6,
            instruments_available: 10,
            coverage_raw: 0.6,
            coverage_effective: 0.7,
            inference_confidence: InferenceConfidence::Medium,
            system_confidence: SystemConfidence::High,
            reasoning: vec![],
            site_classification: SiteClassification::NaturalFormation,
        }
    }

    #[test]
    fn test_glacial_baseline_match_archives() {
        let features = features_near_baseline(EnvironmentType::IceSheet, 0.3);
        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::GlacialMoraine),
            &inference_with(0.25, 0.15),
            &PipelineConfig::default(),
        )
        .expect("rejection expected");

        assert_eq!(rejection.pattern_name, "glacial_moraine");
        assert_eq!(rejection.discard_type, DiscardType::ArchiveScientificNegative);
        assert!(rejection.confidence >= 0.6);
        assert!(rejection.baseline_profile_match >= 0.7);
    }

    #[test]
    fn test_weak_baseline_match_is_operational_discard() {
        // mean |z| = 1.4 -> baseline match 0.30, well under the archive bar
        let features = features_near_baseline(EnvironmentType::Desert, 1.4);
        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::AeolianDuneField),
            &inference_with(0.20, 0.10),
            &PipelineConfig::default(),
        )
        .expect("rejection expected");
        assert_eq!(rejection.discard_type, DiscardType::DiscardOperational);
    }

    #[test]
    fn test_corroborating_priors_archive() {
        let mut features = features_near_baseline(EnvironmentType::Desert, 1.0);
        let mut ctx = HistoricalContextSummary::from_records(&[]);
        ctx.prior_count = 3;
        ctx.rejection_counts.insert("aeolian_dune_field".to_string(), 2);
        features.historical_context = Some(ctx);

        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::AeolianDuneField),
            &inference_with(0.20, 0.10),
            &PipelineConfig::default(),
        )
        .expect("rejection expected");
        assert_eq!(rejection.corroborating_priors, 2);
        assert_eq!(rejection.discard_type, DiscardType::ArchiveScientificNegative);
    }

    #[test]
    fn test_high_anthropic_probability_overrides_match() {
        let features = features_near_baseline(EnvironmentType::IceSheet, 0.3);
        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::GlacialMoraine),
            &inference_with(0.70, 0.50),
            &PipelineConfig::default(),
        );
        assert!(rejection.is_none());
    }

    #[test]
    fn test_no_signature_for_general_terrain() {
        let features = features_near_baseline(EnvironmentType::Grassland, 0.3);
        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::GeneralTerrain),
            &inference_with(0.20, 0.10),
            &PipelineConfig::default(),
        );
        assert!(rejection.is_none());
    }

    #[test]
    fn test_environment_mismatch_blocks_signature() {
        // A moraine hint in grassland is not a plausible moraine
        let features = features_near_baseline(EnvironmentType::Grassland, 0.3);
        let rejection = screen(
            &features,
            &morphology_with_hint(GeomorphologyHint::GlacialMoraine),
            &inference_with(0.20, 0.10),
            &PipelineConfig::default(),
        );
        assert!(rejection.is_none());
    }
}
