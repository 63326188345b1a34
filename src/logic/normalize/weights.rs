//! Per-Environment Instrument Weights
//!
//! Down-weights channels that are structurally non-discriminative in a given
//! environment (vegetation index in true desert or on ice tells you nothing
//! about human modification). Looked up, not constant: calibration data.
//!
//! Weights multiply both the normalized score (Phase A) and the channel's
//! contribution to effective coverage (Phase D).

use crate::logic::environment::EnvironmentType;

// ============================================================================
// WEIGHT TABLE
// ============================================================================

/// Rows of (environment, instrument, weight). Anything not listed has
/// weight 1.0. Kept as a visible table rather than buried control flow.
const WEIGHT_TABLE: &[(EnvironmentType, &str, f64)] = &[
    // Vegetation channels carry no signal where nothing grows
    (EnvironmentType::Desert, "ndvi", 0.10),
    (EnvironmentType::Desert, "vegetation_regularity", 0.20),
    (EnvironmentType::Desert, "soil_moisture", 0.60),
    (EnvironmentType::IceSheet, "ndvi", 0.05),
    (EnvironmentType::IceSheet, "vegetation_regularity", 0.10),
    (EnvironmentType::IceSheet, "soil_moisture", 0.20),
    // Dense canopy obscures ground geometry
    (EnvironmentType::TropicalForest, "surface_planarity", 0.70),
    (EnvironmentType::TropicalForest, "elevation_roughness", 0.70),
    (EnvironmentType::TropicalForest, "thermal_infrared", 0.60),
    // Standing water washes out radar coherence
    (EnvironmentType::Wetland, "sar_coherence", 0.70),
    (EnvironmentType::Coastal, "sar_coherence", 0.80),
];

/// Discriminative weight of an instrument in an environment, in (0,1].
pub fn environment_weight(env: EnvironmentType, instrument: &str) -> f64 {
    WEIGHT_TABLE
        .iter()
        .find(|(e, name, _)| *e == env && *name == instrument)
        .map(|(_, _, w)| *w)
        .unwrap_or(1.0)
}

// ============================================================================
// TESTS
// ============================================================================
