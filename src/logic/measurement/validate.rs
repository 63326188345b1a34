//! Measurement Contract Validation
//!
//! Construction never fails; this validator is the single place where the
//! contract is asserted. Returns a boolean verdict plus warnings for
//! tolerated-but-unusual combinations (e.g. DERIVED carrying a value).

use super::types::{Measurement, MeasurementStatus};

// ============================================================================
// VALIDATION REPORT
// ============================================================================

/// Outcome of validating one measurement
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    /// Hard contract violations (any entry here => invalid)
    pub violations: Vec<String>,
    /// Tolerated-but-unusual combinations
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn ok() -> Self {
        Self { valid: true, violations: Vec::new(), warnings: Vec::new() }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validate one measurement against the contract.
///
/// Invariants checked:
/// - identifying text fields non-empty
/// - confidence in [0,1]
/// - OK => finite numeric value (NaN/Infinity rejected)
/// - non-OK/non-DERIVED => value is None
pub fn validate(m: &Measurement) -> ValidationReport {
    let mut report = ValidationReport::ok();

    if m.instrument_name.trim().is_empty() {
        report.violations.push("instrument_name is empty".to_string());
    }
    if m.source.trim().is_empty() {
        report.violations.push("source is empty".to_string());
    }

    if !(0.0..=1.0).contains(&m.confidence) || !m.confidence.is_finite() {
        report
            .violations
            .push(format!("confidence {} outside [0,1]", m.confidence));
    }

    match m.status {
        MeasurementStatus::Ok => {
            match m.value {
                Some(v) if v.is_finite() => {}
                Some(v) => report
                    .violations
                    .push(format!("OK measurement carries non-finite value {v}")),
                None => report
                    .violations
                    .push("OK measurement carries no value".to_string()),
            }
            if m.measurement_type.trim().is_empty() {
                report
                    .violations
                    .push("OK measurement has empty measurement_type".to_string());
            }
        }
        MeasurementStatus::Derived => {
            // Value is tolerated for DERIVED but worth flagging: consumers
            // must not treat it with the same trust as a direct observation.
            match m.value {
                Some(v) if v.is_finite() => report
                    .warnings
                    .push(format!("DERIVED measurement carries a value ({v})")),
                Some(v) => report
                    .violations
                    .push(format!("DERIVED measurement carries non-finite value {v}")),
                None => {}
            }
        }
        MeasurementStatus::NoData
        | MeasurementStatus::Invalid
        | MeasurementStatus::LowQuality
        | MeasurementStatus::Timeout
        | MeasurementStatus::Error => {
            if m.value.is_some() {
                report.violations.push(format!(
                    "{} measurement must not carry a value",
                    m.status
                ));
            }
            if m.reason.is_none() {
                report
                    .warnings
                    .push(format!("{} measurement has no reason", m.status));
            }
        }
    }

    report.valid = report.violations.is_empty();
    report
}

// ============================================================================
// TESTS
// ============================================================================
