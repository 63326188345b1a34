//! Morphology Types
//!
//! Data structures for Phase C. NO classification logic here - the ordered
//! decision table lives in `table.rs`.

use serde::{Deserialize, Serialize};

use crate::logic::environment::EnvironmentType;

// ============================================================================
// GEOMORPHOLOGY HINT
// ============================================================================

/// Categorical geomorphology hint selected by the decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeomorphologyHint {
    VolcanicConeOrCrater,
    SurfacePatternAnthropicPossible,
    AnthropogenicTerracingPossible,
    AeolianDuneField,
    GlacialMoraine,
    DesertTerrainGeneral,
    GeneralTerrain,
    /// Fewer than two shape channels: degrade instead of guessing a landform
    LowInformationTerrain,
}

impl GeomorphologyHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeomorphologyHint::VolcanicConeOrCrater => "volcanic_cone_or_crater",
            GeomorphologyHint::SurfacePatternAnthropicPossible => "surface_pattern_anthropic_possible",
            GeomorphologyHint::AnthropogenicTerracingPossible => "anthropogenic_terracing_possible",
            GeomorphologyHint::AeolianDuneField => "aeolian_dune_field",
            GeomorphologyHint::GlacialMoraine => "glacial_moraine",
            GeomorphologyHint::DesertTerrainGeneral => "desert_terrain_general",
            GeomorphologyHint::GeneralTerrain => "general_terrain",
            GeomorphologyHint::LowInformationTerrain => "low_information_terrain",
        }
    }

    /// Hints that point toward human surface modification
    pub fn is_anthropic_leaning(&self) -> bool {
        matches!(
            self,
            GeomorphologyHint::SurfacePatternAnthropicPossible
                | GeomorphologyHint::AnthropogenicTerracingPossible
        )
    }
}

impl std::fmt::Display for GeomorphologyHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// OBSERVATION (decision-table input)
// ============================================================================

/// Everything a decision-table predicate may look at.
/// Raw channel values are Options: absence is information, not zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphologyObservation {
    pub symmetry: f32,
    pub edge_regularity: f32,
    pub planarity: f32,
    pub environment: EnvironmentType,
    pub ndvi_raw: Option<f64>,
    pub roughness_raw: Option<f64>,
    pub veg_regularity_raw: Option<f64>,
    pub moisture_raw: Option<f64>,
    /// How many shape-relevant channels were present
    pub channels_used: usize,
}

impl MorphologyObservation {
    /// The basal "no-signal" desert surface state: vegetation reads at floor
    /// level and the surface is smooth. This is the state under which a
    /// geometrically regular feature must NOT be read as a landform.
    pub fn basal_surface_state(&self) -> bool {
        let vegetation_basal = matches!(self.ndvi_raw, Some(v) if v < 0.15);
        let surface_smooth = self.roughness_raw.map(|r| r < 1.5).unwrap_or(true);
        vegetation_basal && surface_smooth
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Optional secondary signature with its own probability (e.g. paleo-channel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialSignature {
    pub name: String,
    pub probability: f32,
}

/// Output of Phase C. Created once per analysis; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphologyResult {
    pub symmetry: f32,
    pub edge_regularity: f32,
    pub planarity: f32,
    pub artificial_pattern_tags: Vec<String>,
    pub geomorphology_hint: GeomorphologyHint,
    /// Name of the decision rule that selected the hint (audit trail)
    pub matched_rule: String,
    pub special_signature: Option<SpecialSignature>,
    pub channels_used: usize,
}

// ============================================================================
// TESTS
// ============================================================================
