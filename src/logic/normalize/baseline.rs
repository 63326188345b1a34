//! Baseline Calibration Tables
//!
//! Per-(environment, instrument) baseline mean/spread with a global fallback.
//! These are CALIBRATION DATA, not load-bearing constants: the table is
//! serde round-trippable so deployments can load their own calibration.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logic::environment::EnvironmentType;

/// Built once; every engine without custom calibration clones from here
static DEFAULT_CALIBRATION: Lazy<BaselineTable> = Lazy::new(BaselineTable::build_default);

// ============================================================================
// BASELINE ENTRY
// ============================================================================

/// Baseline statistics for one instrument channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub mean: f64,
    /// Spread (std-dev scale). Must be positive to be usable.
    pub spread: f64,
}

impl BaselineEntry {
    pub const fn new(mean: f64, spread: f64) -> Self {
        Self { mean, spread }
    }
}

// ============================================================================
// BASELINE TABLE
// ============================================================================

/// Lookup table: environment-specific baselines with global fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineTable {
    global: BTreeMap<String, BaselineEntry>,
    per_environment: BTreeMap<EnvironmentType, BTreeMap<String, BaselineEntry>>,
}

impl BaselineTable {
    pub fn empty() -> Self {
        Self {
            global: BTreeMap::new(),
            per_environment: BTreeMap::new(),
        }
    }

    /// Look up the baseline for an instrument: environment-specific first,
    /// then global fallback.
    pub fn lookup(&self, env: EnvironmentType, instrument: &str) -> Option<BaselineEntry> {
        if let Some(envs) = self.per_environment.get(&env) {
            if let Some(entry) = envs.get(instrument) {
                return Some(*entry);
            }
        }
        self.global.get(instrument).copied()
    }

    pub fn set_global(&mut self, instrument: &str, entry: BaselineEntry) {
        self.global.insert(instrument.to_string(), entry);
    }

    pub fn set_environment(&mut self, env: EnvironmentType, instrument: &str, entry: BaselineEntry) {
        self.per_environment
            .entry(env)
            .or_default()
            .insert(instrument.to_string(), entry);
    }

    /// Default calibration. Values are plausible central tendencies for the
    /// instrument set; a deployment should replace them with measured ones.
    pub fn default_calibration() -> Self {
        DEFAULT_CALIBRATION.clone()
    }

    fn build_default() -> Self {
        use EnvironmentType::*;

        let mut t = Self::empty();

        // --- Global fallback ---
        t.set_global("sar_backscatter", BaselineEntry::new(-12.0, 4.0));
        t.set_global("sar_coherence", BaselineEntry::new(0.35, 0.18));
        t.set_global("ndvi", BaselineEntry::new(0.30, 0.20));
        t.set_global("vegetation_regularity", BaselineEntry::new(0.30, 0.15));
        t.set_global("elevation_roughness", BaselineEntry::new(2.5, 1.8));
        t.set_global("surface_planarity", BaselineEntry::new(0.40, 0.20));
        t.set_global("thermal_infrared", BaselineEntry::new(288.0, 10.0));
        t.set_global("soil_moisture", BaselineEntry::new(0.18, 0.09));
        t.set_global("nightlights", BaselineEntry::new(0.8, 1.5));
        t.set_global("magnetic_gradient", BaselineEntry::new(0.0, 3.0));

        // --- Desert ---
        t.set_environment(Desert, "ndvi", BaselineEntry::new(0.08, 0.05));
        t.set_environment(Desert, "vegetation_regularity", BaselineEntry::new(0.10, 0.08));
        t.set_environment(Desert, "soil_moisture", BaselineEntry::new(0.05, 0.03));
        t.set_environment(Desert, "thermal_infrared", BaselineEntry::new(305.0, 8.0));
        t.set_environment(Desert, "elevation_roughness", BaselineEntry::new(1.2, 1.0));

        // --- Ice sheet ---
        t.set_environment(IceSheet, "ndvi", BaselineEntry::new(0.02, 0.02));
        t.set_environment(IceSheet, "soil_moisture", BaselineEntry::new(0.02, 0.02));
        t.set_environment(IceSheet, "thermal_infrared", BaselineEntry::new(250.0, 8.0));
        t.set_environment(IceSheet, "sar_backscatter", BaselineEntry::new(-8.0, 3.0));

        // --- Tropical forest ---
        t.set_environment(TropicalForest, "ndvi", BaselineEntry::new(0.75, 0.10));
        t.set_environment(TropicalForest, "vegetation_regularity", BaselineEntry::new(0.45, 0.15));

        // --- Grassland ---
        t.set_environment(Grassland, "ndvi", BaselineEntry::new(0.45, 0.15));

        // --- Mountain ---
        t.set_environment(Mountain, "elevation_roughness", BaselineEntry::new(6.0, 3.0));

        // --- Coastal ---
        t.set_environment(Coastal, "soil_moisture", BaselineEntry::new(0.30, 0.10));

        // --- Wetland ---
        t.set_environment(Wetland, "ndvi", BaselineEntry::new(0.55, 0.15));
        t.set_environment(Wetland, "soil_moisture", BaselineEntry::new(0.40, 0.10));

        t
    }
}

impl Default for BaselineTable {
    fn default() -> Self {
        Self::default_calibration()
    }
}

// ============================================================================
// TESTS
// ============================================================================
