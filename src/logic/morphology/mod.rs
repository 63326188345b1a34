//! Morphology Module - Phase C
//!
//! Computes symmetry, edge regularity and planarity from the shape-relevant
//! channels, then selects a geomorphology hint from the ordered decision
//! table in `table.rs`.
//!
//! # Architecture
//! - `types.rs`: `MorphologyResult`, `GeomorphologyHint`, observation struct
//! - `table.rs`: the ordered (predicate, hint) decision table
//!
//! Inputs come from the RAW snapshot of the feature set: symmetry and
//! planarity are absolute geometric properties, not environment-relative.

pub mod table;
pub mod types;

use crate::logic::environment::EnvironmentType;
use crate::logic::instruments::SHAPE_CHANNELS;
use crate::logic::normalize::NormalizedFeatureSet;

pub use types::{GeomorphologyHint, MorphologyObservation, MorphologyResult, SpecialSignature};

/// Roughness (m) at which planarity derived from roughness reaches zero
const ROUGHNESS_PLANARITY_REF: f64 = 5.0;

// ============================================================================
// PHASE C
// ============================================================================

/// Analyze shape evidence in the feature set.
pub fn analyze(features: &NormalizedFeatureSet) -> MorphologyResult {
    let coherence = features.raw_value("sar_coherence");
    let veg_regularity = features.raw_value("vegetation_regularity");
    let roughness = features.raw_value("elevation_roughness");
    let planarity_raw = features.raw_value("surface_planarity");

    let channels_used = SHAPE_CHANNELS
        .iter()
        .filter(|c| features.raw_value(c).is_some())
        .count();

    // Symmetry: radar-return regularity, vegetation pattern as fallback
    let symmetry = coherence
        .or(veg_regularity)
        .map(|v| clamp01(v))
        .unwrap_or(0.0);

    // Edge regularity: mean of the pattern-regularity channels present
    let edge_inputs: Vec<f64> = [veg_regularity, coherence].into_iter().flatten().collect();
    let edge_regularity = if edge_inputs.is_empty() {
        0.0
    } else {
        clamp01(edge_inputs.iter().sum::<f64>() / edge_inputs.len() as f64)
    };

    // Planarity: direct plane-fit channel, else inverted roughness
    let planarity = planarity_raw
        .map(clamp01)
        .or_else(|| roughness.map(|r| 1.0 - clamp01(r / ROUGHNESS_PLANARITY_REF)))
        .unwrap_or(0.0);

    let obs = MorphologyObservation {
        symmetry,
        edge_regularity,
        planarity,
        environment: features.environment,
        ndvi_raw: features.raw_value("ndvi"),
        roughness_raw: roughness,
        veg_regularity_raw: veg_regularity,
        moisture_raw: features.raw_value("soil_moisture"),
        channels_used,
    };

    let (hint, matched_rule) = table::classify(&obs);

    let artificial_pattern_tags = collect_tags(&obs);
    let special_signature = detect_special_signature(&obs);

    log::debug!(
        "Morphology for '{}': hint={} (rule={}), sym={:.2} edge={:.2} plan={:.2}",
        features.candidate_id,
        hint,
        matched_rule,
        obs.symmetry,
        obs.edge_regularity,
        obs.planarity
    );

    MorphologyResult {
        symmetry: obs.symmetry,
        edge_regularity: obs.edge_regularity,
        planarity: obs.planarity,
        artificial_pattern_tags,
        geomorphology_hint: hint,
        matched_rule: matched_rule.to_string(),
        special_signature,
        channels_used,
    }
}

fn clamp01(v: f64) -> f32 {
    v.clamp(0.0, 1.0) as f32
}

// ============================================================================
// PATTERN TAGS
// ============================================================================

fn collect_tags(obs: &MorphologyObservation) -> Vec<String> {
    let mut tags = Vec::new();
    if obs.symmetry >= 0.70 {
        tags.push("radial_or_axial_symmetry".to_string());
    }
    if obs.edge_regularity >= 0.70 {
        tags.push("rectilinear_edges".to_string());
    }
    if obs.planarity >= 0.70 {
        tags.push("planar_platform".to_string());
    }
    if obs.veg_regularity_raw.map(|v| v >= 0.70).unwrap_or(false) {
        tags.push("periodic_spacing".to_string());
    }
    tags
}

// ============================================================================
// SPECIAL SIGNATURES
// ============================================================================

/// Secondary signatures with their own probability. Currently: paleo-channel
/// (buried watercourse) - anomalous residual moisture threading a smooth,
/// edge-regular desert surface.
fn detect_special_signature(obs: &MorphologyObservation) -> Option<SpecialSignature> {
    if obs.environment != EnvironmentType::Desert {
        return None;
    }
    let moisture = obs.moisture_raw?;
    let roughness = obs.roughness_raw?;

    if moisture >= 0.10 && roughness < 1.0 && obs.edge_regularity >= 0.50 {
        let probability =
            (0.35 + 2.0 * moisture as f32 + 0.15 * obs.edge_regularity).clamp(0.0, 0.9);
        return Some(SpecialSignature { name: "paleo_channel".to_string(), probability });
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::environment::EnvironmentType;

    fn set_with_raw(env: EnvironmentType, entries: &[(&str, f64)]) -> NormalizedFeatureSet {
        let mut s = NormalizedFeatureSet::empty("c1", env);
        for (name, v) in entries {
            s.raw.insert(name.to_string(), *v);
            s.features.insert(name.to_string(), 0.0);
        }
        s
    }

    #[test]
    fn test_desert_geometric_pattern_regression() {
        // symmetry 0.75 / planarity 0.80 / basal vegetation -> surface pattern
        let set = set_with_raw(
            EnvironmentType::Desert,
            &[
                ("sar_coherence", 0.75),
                ("surface_planarity", 0.80),
                ("elevation_roughness", 0.4),
                ("ndvi", 0.08),
            ],
        );
        let m = analyze(&set);
        assert!((m.symmetry - 0.75).abs() < 1e-6);
        assert!((m.planarity - 0.80).abs() < 1e-6);
        assert_eq!(m.geomorphology_hint, GeomorphologyHint::SurfacePatternAnthropicPossible);
    }

    #[test]
    fn test_planarity_from_roughness_fallback() {
        let set = set_with_raw(
            EnvironmentType::Grassland,
            &[("sar_coherence", 0.5), ("elevation_roughness", 2.5)],
        );
        let m = analyze(&set);
        // 1 - 2.5/5.0 = 0.5
        assert!((m.planarity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_single_channel_degrades() {
        let set = set_with_raw(EnvironmentType::Desert, &[("sar_coherence", 0.9)]);
        let m = analyze(&set);
        assert_eq!(m.channels_used, 1);
        assert_eq!(m.geomorphology_hint, GeomorphologyHint::LowInformationTerrain);
    }

    #[test]
    fn test_artificial_pattern_tags() {
        let set = set_with_raw(
            EnvironmentType::Desert,
            &[
                ("sar_coherence", 0.85),
                ("vegetation_regularity", 0.75),
                ("surface_planarity", 0.90),
                ("ndvi", 0.05),
            ],
        );
        let m = analyze(&set);
        assert!(m.artificial_pattern_tags.contains(&"radial_or_axial_symmetry".to_string()));
        assert!(m.artificial_pattern_tags.contains(&"rectilinear_edges".to_string()));
        assert!(m.artificial_pattern_tags.contains(&"planar_platform".to_string()));
        assert!(m.artificial_pattern_tags.contains(&"periodic_spacing".to_string()));
    }

    #[test]
    fn test_paleo_channel_signature() {
        let set = set_with_raw(
            EnvironmentType::Desert,
            &[
                ("sar_coherence", 0.60),
                ("elevation_roughness", 0.5),
                ("soil_moisture", 0.14),
                ("surface_planarity", 0.6),
            ],
        );
        let m = analyze(&set);
        let sig = m.special_signature.expect("paleo channel expected");
        assert_eq!(sig.name, "paleo_channel");
        assert!(sig.probability > 0.0 && sig.probability <= 0.9);
    }

    #[test]
    fn test_no_special_signature_outside_desert() {
        let set = set_with_raw(
            EnvironmentType::Wetland,
            &[
                ("sar_coherence", 0.60),
                ("elevation_roughness", 0.5),
                ("soil_moisture", 0.40),
                ("surface_planarity", 0.6),
            ],
        );
        assert!(analyze(&set).special_signature.is_none());
    }
}
