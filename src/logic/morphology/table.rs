//! Geomorphology Decision Table
//!
//! An explicit, ORDERED table of (rule, predicate, hint) rows. Priority is a
//! visible, testable data structure, not buried control flow.
//!
//! Ordering rule: surface-pattern explanations come BEFORE landform
//! explanations. A geometrically regular, low-vegetation desert feature with
//! high symmetry and planarity must resolve as a possible surface pattern,
//! never as a volcanic landform.

use crate::logic::environment::EnvironmentType;

use super::types::{GeomorphologyHint, MorphologyObservation};

// ============================================================================
// DECISION RULE
// ============================================================================

pub struct DecisionRule {
    pub name: &'static str,
    pub predicate: fn(&MorphologyObservation) -> bool,
    pub hint: GeomorphologyHint,
}

// ============================================================================
// THE TABLE (order is semantics)
// ============================================================================

pub static DECISION_TABLE: &[DecisionRule] = &[
    // --- Surface-pattern explanations first ---
    DecisionRule {
        name: "regular_planar_pattern_on_basal_surface",
        predicate: |o| o.symmetry >= 0.65 && o.planarity >= 0.70 && o.basal_surface_state(),
        hint: GeomorphologyHint::SurfacePatternAnthropicPossible,
    },
    DecisionRule {
        name: "stepped_slopes_with_regular_edges",
        predicate: |o| {
            o.edge_regularity >= 0.70
                && (0.35..0.70).contains(&o.planarity)
                && matches!(
                    o.environment,
                    EnvironmentType::Mountain
                        | EnvironmentType::Grassland
                        | EnvironmentType::TropicalForest
                )
        },
        hint: GeomorphologyHint::AnthropogenicTerracingPossible,
    },
    // --- Landform explanations ---
    DecisionRule {
        name: "radial_symmetry_on_rough_conical_relief",
        predicate: |o| {
            o.symmetry >= 0.70
                && o.planarity < 0.35
                && o.roughness_raw.map(|r| r >= 3.0).unwrap_or(false)
        },
        hint: GeomorphologyHint::VolcanicConeOrCrater,
    },
    DecisionRule {
        name: "periodic_ridges_on_bare_sand",
        predicate: |o| {
            o.environment == EnvironmentType::Desert
                && o.ndvi_raw.map(|v| v < 0.15).unwrap_or(false)
                && o.edge_regularity >= 0.45
                && o.planarity < 0.55
                && o.symmetry < 0.65
        },
        hint: GeomorphologyHint::AeolianDuneField,
    },
    DecisionRule {
        name: "asymmetric_linear_debris_ridge",
        predicate: |o| {
            matches!(
                o.environment,
                EnvironmentType::IceSheet | EnvironmentType::Mountain
            ) && o.symmetry < 0.50
                && o.edge_regularity >= 0.40
        },
        hint: GeomorphologyHint::GlacialMoraine,
    },
    // --- Environment fallbacks ---
    DecisionRule {
        name: "undistinguished_desert_terrain",
        predicate: |o| o.environment == EnvironmentType::Desert,
        hint: GeomorphologyHint::DesertTerrainGeneral,
    },
];

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Walk the table in order; first matching row wins.
///
/// Fewer than two shape channels short-circuits to the generic
/// low-information hint: better to admit ignorance than guess a landform.
pub fn classify(obs: &MorphologyObservation) -> (GeomorphologyHint, &'static str) {
    if obs.channels_used < 2 {
        return (GeomorphologyHint::LowInformationTerrain, "insufficient_shape_channels");
    }

    for rule in DECISION_TABLE {
        if (rule.predicate)(obs) {
            return (rule.hint, rule.name);
        }
    }

    (GeomorphologyHint::GeneralTerrain, "no_rule_matched")
}

// ============================================================================
// TESTS
// ============================================================================
