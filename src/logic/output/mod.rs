//! Output Assembly Module - Phase F/G
//!
//! Deterministically merges every stage output into one immutable
//! `ScientificOutputRecord`. No randomness, no wall-clock: identical inputs
//! produce a byte-identical record.
//!
//! # Architecture
//! - `types.rs`: the record, snapshots bundle, action/confidence taxonomies
//! - `notes.rs`: the strictly numeric-state-derived notes text

pub mod notes;
pub mod types;

use uuid::Uuid;

use crate::logic::antipattern::DiscardType;
use crate::logic::config::{combined_anthropic_probability, PipelineConfig};
use crate::logic::environment::EnvironmentClassification;
use crate::logic::history::KnownSite;
use crate::logic::inference::{InferenceConfidence, SiteClassification};
use crate::logic::strangeness::StrangenessLevel;

pub use types::{
    AnalysisSnapshots, RecommendedAction, ScientificConfidence, ScientificOutputRecord,
    RECORD_NAMESPACE,
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Known site within this range plus strong origin marks a rediscovery
const REDISCOVERY_RADIUS_KM: f64 = 5.0;
const REDISCOVERY_ORIGIN_MIN: f32 = 0.60;

/// Baseline-profile match at/above which an archived rejection is a
/// high-confidence negative
const ARCHIVE_HIGH_CONFIDENCE_MATCH: f32 = 0.80;

// ============================================================================
// PHASE F/G
// ============================================================================

pub fn assemble(
    candidate_id: &str,
    region_name: &str,
    environment: &EnvironmentClassification,
    snapshots: &AnalysisSnapshots,
    nearby_sites: &[KnownSite],
    config: &PipelineConfig,
) -> ScientificOutputRecord {
    let inference = &snapshots.inference;

    let combined =
        combined_anthropic_probability(inference.origin.value, inference.activity.value);

    let (candidate_type, discard_type) = match &snapshots.rejection {
        Some(r) => (r.pattern_name.clone(), r.discard_type),
        None => (inference.site_classification.as_str().to_string(), DiscardType::None),
    };

    let scientific_confidence = derive_scientific_confidence(snapshots);
    let recommended_action = derive_action(snapshots, scientific_confidence);

    let nearby_known_site = nearest_site(nearby_sites);
    let rediscovery = nearby_known_site
        .as_ref()
        .map(|s| {
            s.distance_km <= REDISCOVERY_RADIUS_KM
                && inference.origin.value >= REDISCOVERY_ORIGIN_MIN
        })
        .unwrap_or(false);

    let notes = notes::build(
        &snapshots.anomaly,
        &snapshots.morphology,
        &snapshots.coverage,
        inference,
        snapshots.rejection.as_ref(),
        &snapshots.strangeness,
        combined,
        config,
    );

    ScientificOutputRecord {
        record_id: Uuid::new_v5(&RECORD_NAMESPACE, candidate_id.as_bytes()),
        candidate_id: candidate_id.to_string(),
        region_name: region_name.to_string(),
        environment: environment.clone(),
        anomaly_score: snapshots.anomaly.score,
        origin: inference.origin,
        activity: inference.activity,
        combined_anthropic_probability: combined,
        candidate_type,
        recommended_action,
        discard_type,
        scientific_confidence,
        strangeness_level: snapshots.strangeness.level,
        notes,
        nearby_known_site,
        rediscovery,
        feature_version: snapshots.features.feature_version,
        layout_hash: snapshots.features.layout_hash,
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn derive_scientific_confidence(snapshots: &AnalysisSnapshots) -> ScientificConfidence {
    if let Some(r) = &snapshots.rejection {
        // An archived negative is a conclusion in its own right; its
        // confidence comes from the baseline-profile match
        if r.discard_type == DiscardType::ArchiveScientificNegative {
            return if r.baseline_profile_match >= ARCHIVE_HIGH_CONFIDENCE_MATCH {
                ScientificConfidence::High
            } else {
                ScientificConfidence::MediumHigh
            };
        }
        return ScientificConfidence::Medium;
    }

    match snapshots.inference.inference_confidence {
        InferenceConfidence::Low => ScientificConfidence::Low,
        InferenceConfidence::Medium => ScientificConfidence::Medium,
        InferenceConfidence::MediumHigh => ScientificConfidence::MediumHigh,
        InferenceConfidence::High => ScientificConfidence::High,
    }
}

fn derive_action(
    snapshots: &AnalysisSnapshots,
    confidence: ScientificConfidence,
) -> RecommendedAction {
    if let Some(r) = &snapshots.rejection {
        return match r.discard_type {
            DiscardType::ArchiveScientificNegative => RecommendedAction::ArchiveAsNegative,
            _ => RecommendedAction::Discard,
        };
    }

    let inference = &snapshots.inference;
    match inference.site_classification {
        SiteClassification::ActiveSite => RecommendedAction::ReviewPriority,
        SiteClassification::HistoricalStructure => {
            if inference.origin.value >= 0.75 && confidence >= ScientificConfidence::MediumHigh {
                RecommendedAction::FieldSurveyCandidate
            } else {
                RecommendedAction::ReviewPriority
            }
        }
        SiteClassification::NaturalFormation | SiteClassification::NaturalAnomaly => {
            RecommendedAction::MonitorRoutine
        }
        SiteClassification::Ambiguous => {
            if snapshots.strangeness.level >= StrangenessLevel::High {
                RecommendedAction::ReviewPriority
            } else {
                RecommendedAction::MonitorRoutine
            }
        }
    }
}

fn nearest_site(sites: &[KnownSite]) -> Option<KnownSite> {
    sites
        .iter()
        .min_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned()
}

// ============================================================================
// TESTS
// ============================================================================
