//! Curated Natural False-Positive Signatures
//!
//! Each signature names a natural landform whose remote-sensing footprint can
//! mimic an anthropogenic one. The table is data: adding a signature means
//! adding a row, not control flow.

use crate::logic::environment::EnvironmentType;
use crate::logic::morphology::GeomorphologyHint;

// ============================================================================
// SIGNATURE TABLE
// ============================================================================

pub struct AntiPatternSignature {
    pub name: &'static str,
    /// Geomorphology hint that triggers this signature
    pub hint: GeomorphologyHint,
    /// Environments in which the landform plausibly occurs
    pub environments: &'static [EnvironmentType],
}

pub static SIGNATURES: &[AntiPatternSignature] = &[
    AntiPatternSignature {
        name: "aeolian_dune_field",
        hint: GeomorphologyHint::AeolianDuneField,
        environments: &[EnvironmentType::Desert, EnvironmentType::Coastal],
    },
    AntiPatternSignature {
        name: "glacial_moraine",
        hint: GeomorphologyHint::GlacialMoraine,
        environments: &[EnvironmentType::IceSheet, EnvironmentType::Mountain],
    },
    AntiPatternSignature {
        name: "volcanic_cone",
        hint: GeomorphologyHint::VolcanicConeOrCrater,
        environments: &[
            EnvironmentType::Mountain,
            EnvironmentType::Desert,
            EnvironmentType::Grassland,
            EnvironmentType::TropicalForest,
            EnvironmentType::IceSheet,
            EnvironmentType::Coastal,
            EnvironmentType::Wetland,
        ],
    },
];

/// Find the signature matching the morphology hint, if the environment fits.
pub fn matching_signature(
    hint: GeomorphologyHint,
    env: EnvironmentType,
) -> Option<&'static AntiPatternSignature> {
    SIGNATURES
        .iter()
        .find(|s| s.hint == hint && s.environments.contains(&env))
}

// ============================================================================
// TESTS
// ============================================================================
