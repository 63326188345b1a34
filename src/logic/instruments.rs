//! Instrument Layout - Centralized Instrument Channel Definition
//!
//! **CRITICAL: This file controls the instrument channel schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add channel → increment INSTRUMENT_VERSION
//! 2. Change order → increment INSTRUMENT_VERSION
//! 3. Remove channel → increment INSTRUMENT_VERSION
//!
//! ## Why versioning matters:
//! - Baseline calibration compatibility
//! - Replay of archived analyses
//! - Cross-version record comparison

use crc32fast::Hasher;

// ============================================================================
// INSTRUMENT VERSION
// ============================================================================

/// Current instrument layout version
/// MUST be incremented when layout changes
pub const INSTRUMENT_VERSION: u8 = 1;

// ============================================================================
// INSTRUMENT LAYOUT (Authoritative source)
// ============================================================================

/// Instrument channel names in canonical order.
/// This is the SINGLE SOURCE OF TRUTH for the channel layout.
pub const INSTRUMENT_LAYOUT: &[&str] = &[
    // === Radar (0-1) ===
    "sar_backscatter",       // 0: SAR backscatter intensity (dB)
    "sar_coherence",         // 1: Radar-return regularity (0-1)

    // === Vegetation (2-3) ===
    "ndvi",                  // 2: Normalized difference vegetation index (-1..1)
    "vegetation_regularity", // 3: Spatial regularity of vegetation pattern (0-1)

    // === Terrain (4-5) ===
    "elevation_roughness",   // 4: Std-dev of elevation within bbox (m)
    "surface_planarity",     // 5: Plane-fit quality of the surface (0-1)

    // === Disturbance (6-8) ===
    "thermal_infrared",      // 6: Surface temperature (K)
    "soil_moisture",         // 7: Volumetric soil moisture (m3/m3)
    "nightlights",           // 8: Night-time radiance (nW/cm2/sr)

    // === Subsurface (9) ===
    "magnetic_gradient",     // 9: Magnetic field gradient (nT/m)
];

/// Total number of instrument channels
/// IMPORTANT: Must match INSTRUMENT_LAYOUT.len()!
pub const INSTRUMENT_COUNT: usize = 10;

/// Channels that carry shape/geometry information (Phase C inputs)
pub const SHAPE_CHANNELS: &[&str] = &[
    "sar_coherence",
    "vegetation_regularity",
    "elevation_roughness",
    "surface_planarity",
];

/// Channels sensitive to current/recent disturbance (Phase D activity axis)
pub const DISTURBANCE_CHANNELS: &[&str] = &[
    "thermal_infrared",
    "soil_moisture",
    "nightlights",
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the instrument layout.
/// Used to detect layout mismatches when replaying archived feature sets.
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[INSTRUMENT_VERSION]);

    // Hash all channel names in order
    for name in INSTRUMENT_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash (inputs are const, so this is stable for the build)
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when an archived feature set doesn't match the current layout
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instrument layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches the current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != INSTRUMENT_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: INSTRUMENT_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// CHANNEL LOOKUP
// ============================================================================

/// Get channel index by name (O(n) but channels are few)
pub fn instrument_index(name: &str) -> Option<usize> {
    INSTRUMENT_LAYOUT.iter().position(|&n| n == name)
}

/// Whether a channel carries shape/geometry information
pub fn is_shape_channel(name: &str) -> bool {
    SHAPE_CHANNELS.contains(&name)
}

/// Whether a channel is sensitive to current disturbance
pub fn is_disturbance_channel(name: &str) -> bool {
    DISTURBANCE_CHANNELS.contains(&name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_count() {
        assert_eq!(INSTRUMENT_COUNT, 10);
        assert_eq!(INSTRUMENT_LAYOUT.len(), INSTRUMENT_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        let hash1 = compute_layout_hash();
        let hash2 = compute_layout_hash();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_layout_hash_non_zero() {
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout_success() {
        assert!(validate_layout(INSTRUMENT_VERSION, layout_hash()).is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        assert!(validate_layout(INSTRUMENT_VERSION + 1, layout_hash()).is_err());
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        assert!(validate_layout(INSTRUMENT_VERSION, layout_hash() ^ 1).is_err());
    }

    #[test]
    fn test_instrument_index() {
        assert_eq!(instrument_index("sar_backscatter"), Some(0));
        assert_eq!(instrument_index("ndvi"), Some(2));
        assert_eq!(instrument_index("magnetic_gradient"), Some(9));
        assert_eq!(instrument_index("nonexistent"), None);
    }

    #[test]
    fn test_shape_channels_are_known() {
        for name in SHAPE_CHANNELS {
            assert!(instrument_index(name).is_some(), "unknown shape channel {name}");
        }
        assert!(is_shape_channel("sar_coherence"));
        assert!(!is_shape_channel("nightlights"));
    }

    #[test]
    fn test_disturbance_channels_are_known() {
        for name in DISTURBANCE_CHANNELS {
            assert!(instrument_index(name).is_some(), "unknown disturbance channel {name}");
        }
        assert!(is_disturbance_channel("nightlights"));
        assert!(!is_disturbance_channel("sar_coherence"));
    }
}
