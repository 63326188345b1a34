//! Environment Classification Types & Collaborator Boundary
//!
//! The environment classifier itself is an external collaborator; this module
//! owns the closed environment taxonomy and the trait the pipeline calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// ENVIRONMENT TYPE
// ============================================================================

/// Closed environment taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    Desert,
    IceSheet,
    TropicalForest,
    Grassland,
    Mountain,
    Coastal,
    Wetland,
    /// Classifier unavailable or inconclusive; global baselines apply
    Unknown,
}

impl EnvironmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::Desert => "desert",
            EnvironmentType::IceSheet => "ice_sheet",
            EnvironmentType::TropicalForest => "tropical_forest",
            EnvironmentType::Grassland => "grassland",
            EnvironmentType::Mountain => "mountain",
            EnvironmentType::Coastal => "coastal",
            EnvironmentType::Wetland => "wetland",
            EnvironmentType::Unknown => "unknown",
        }
    }

    /// All concrete environments (excludes Unknown)
    pub fn all() -> &'static [EnvironmentType] {
        &[
            EnvironmentType::Desert,
            EnvironmentType::IceSheet,
            EnvironmentType::TropicalForest,
            EnvironmentType::Grassland,
            EnvironmentType::Mountain,
            EnvironmentType::Coastal,
            EnvironmentType::Wetland,
        ]
    }
}

impl std::fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFICATION RECORD
// ============================================================================

/// Result of classifying a coordinate pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentClassification {
    pub environment_type: EnvironmentType,
    /// Classifier confidence in [0,1]
    pub confidence: f32,
    /// Instruments recommended as primary for this environment
    pub primary_sensors: Vec<String>,
    pub secondary_sensors: Vec<String>,
    /// How visible archaeology tends to be in this environment (0-1)
    pub archaeological_visibility: f32,
    /// How well structures survive in this environment (0-1)
    pub preservation_potential: f32,
}

impl EnvironmentClassification {
    /// Degraded classification when the external classifier fails.
    /// Never a pipeline error: global baselines and weights apply.
    pub fn unknown() -> Self {
        Self {
            environment_type: EnvironmentType::Unknown,
            confidence: 0.0,
            primary_sensors: Vec::new(),
            secondary_sensors: Vec::new(),
            archaeological_visibility: 0.5,
            preservation_potential: 0.5,
        }
    }
}

// ============================================================================
// COLLABORATOR TRAIT
// ============================================================================

/// External environment classifier: coordinates -> environment.
#[async_trait]
pub trait EnvironmentClassifier: Send + Sync {
    async fn classify(&self, lat: f64, lon: f64) -> Result<EnvironmentClassification, String>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_as_str() {
        assert_eq!(EnvironmentType::Desert.as_str(), "desert");
        assert_eq!(EnvironmentType::IceSheet.as_str(), "ice_sheet");
    }

    #[test]
    fn test_all_excludes_unknown() {
        assert!(!EnvironmentType::all().contains(&EnvironmentType::Unknown));
        assert_eq!(EnvironmentType::all().len(), 7);
    }

    #[test]
    fn test_unknown_classification_is_neutral() {
        let c = EnvironmentClassification::unknown();
        assert_eq!(c.environment_type, EnvironmentType::Unknown);
        assert_eq!(c.confidence, 0.0);
    }
}
