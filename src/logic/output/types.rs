//! Output Record Types
//!
//! The immutable end-of-pipeline record plus the per-phase snapshot bundle.
//! NO assembly logic here - only data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::anomaly::AnomalyResult;
use crate::logic::antipattern::{AntiPatternRejection, DiscardType};
use crate::logic::environment::EnvironmentClassification;
use crate::logic::history::KnownSite;
use crate::logic::inference::{AnthropicInferenceResult, CoverageReport, ProbabilityEstimate};
use crate::logic::morphology::MorphologyResult;
use crate::logic::normalize::NormalizedFeatureSet;
use crate::logic::strangeness::{StrangenessLevel, StrangenessResult};

/// UUIDv5 namespace for record ids. Ids are a pure function of the candidate
/// id, so identical inputs reproduce identical records byte for byte.
pub const RECORD_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6e, 0x1c, 0x0d, 0x2a, 0x9b, 0x47, 0x5b, 0xf3, 0x8f, 0x02, 0xd4, 0x66, 0x21, 0x58, 0x3a,
    0x7c,
]);

// ============================================================================
// SCIENTIFIC CONFIDENCE
// ============================================================================

/// Confidence attached to the final scientific conclusion. Derived from
/// inference confidence and, for rejections, from the baseline-profile match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScientificConfidence {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl ScientificConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScientificConfidence::Low => "low",
            ScientificConfidence::Medium => "medium",
            ScientificConfidence::MediumHigh => "medium_high",
            ScientificConfidence::High => "high",
        }
    }
}

impl std::fmt::Display for ScientificConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RECOMMENDED ACTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    Discard,
    ArchiveAsNegative,
    MonitorRoutine,
    ReviewPriority,
    FieldSurveyCandidate,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Discard => "discard",
            RecommendedAction::ArchiveAsNegative => "archive_as_negative",
            RecommendedAction::MonitorRoutine => "monitor_routine",
            RecommendedAction::ReviewPriority => "review_priority",
            RecommendedAction::FieldSurveyCandidate => "field_survey_candidate",
        }
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// OUTPUT RECORD
// ============================================================================

/// Final record of one analysis. Created once; persisted append-only;
/// re-analysis creates a new record. Carries no wall-clock fields so that
/// identical inputs serialize byte-identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScientificOutputRecord {
    pub record_id: Uuid,
    pub candidate_id: String,
    pub region_name: String,
    pub environment: EnvironmentClassification,
    pub anomaly_score: f32,
    pub origin: ProbabilityEstimate,
    pub activity: ProbabilityEstimate,
    /// `config::combined_anthropic_probability(origin, activity)`
    pub combined_anthropic_probability: f32,
    /// Rejected pattern name, or the site classification
    pub candidate_type: String,
    pub recommended_action: RecommendedAction,
    pub discard_type: DiscardType,
    pub scientific_confidence: ScientificConfidence,
    pub strangeness_level: StrangenessLevel,
    /// Wording strictly derived from numeric state (see `notes.rs`)
    pub notes: String,
    /// Annotation only - never consulted by any scoring phase
    pub nearby_known_site: Option<KnownSite>,
    pub rediscovery: bool,
    pub feature_version: u8,
    pub layout_hash: u32,
}

// ============================================================================
// PHASE SNAPSHOTS
// ============================================================================

/// Every intermediate phase output of one analysis, persisted alongside the
/// record for auditability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshots {
    pub features: NormalizedFeatureSet,
    pub anomaly: AnomalyResult,
    pub morphology: MorphologyResult,
    pub coverage: CoverageReport,
    pub inference: AnthropicInferenceResult,
    pub rejection: Option<AntiPatternRejection>,
    pub strangeness: StrangenessResult,
}

// ============================================================================
// TESTS
// ============================================================================
