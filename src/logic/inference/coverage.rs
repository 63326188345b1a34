//! Coverage Accounting
//!
//! raw = usable / available. effective additionally weights each channel by
//! its per-environment discriminative value, so a missing vegetation index
//! in true desert does not count fully against the estimate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::environment::EnvironmentType;
use crate::logic::measurement::Measurement;
use crate::logic::normalize::environment_weight;

// ============================================================================
// COVERAGE REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub instruments_measured: usize,
    pub instruments_available: usize,
    /// usable / available, unweighted
    pub raw: f32,
    /// environment-weighted coverage
    pub effective: f32,
}

impl CoverageReport {
    /// No instruments at all (degenerate request)
    pub fn empty() -> Self {
        Self {
            instruments_measured: 0,
            instruments_available: 0,
            raw: 0.0,
            effective: 0.0,
        }
    }
}

// ============================================================================
// COMPUTATION
// ============================================================================

pub fn compute(
    measurements: &BTreeMap<String, Measurement>,
    env: EnvironmentType,
) -> CoverageReport {
    let available = measurements.len();
    if available == 0 {
        return CoverageReport::empty();
    }

    let measured = measurements.values().filter(|m| m.is_usable()).count();

    let mut weight_total = 0.0f32;
    let mut weight_usable = 0.0f32;
    for (name, m) in measurements {
        let w = environment_weight(env, name) as f32;
        weight_total += w;
        if m.is_usable() {
            weight_usable += w;
        }
    }

    let raw = measured as f32 / available as f32;
    let effective = if weight_total > 0.0 {
        weight_usable / weight_total
    } else {
        0.0
    };

    CoverageReport {
        instruments_measured: measured,
        instruments_available: available,
        raw,
        effective,
    }
}

// ============================================================================
// TESTS
// ============================================================================
