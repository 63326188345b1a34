//! Measurement Types
//!
//! Core types for the instrument measurement contract.
//! NO logic here - only data structures and factory constructors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// MEASUREMENT STATUS
// ============================================================================

/// Closed status taxonomy for a measurement. Exactly 7 kinds; every consumer
/// matches exhaustively instead of branching on ad-hoc field combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementStatus {
    /// Valid measurement with a finite numeric value
    Ok,
    /// Provider responded but has no data for the region
    NoData,
    /// Provider data failed provider-side validation
    Invalid,
    /// Data exists but below usable quality
    LowQuality,
    /// Value derived from other channels rather than measured directly
    Derived,
    /// Provider exceeded the bounded timeout
    Timeout,
    /// Provider call failed or violated the contract
    Error,
}

impl MeasurementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementStatus::Ok => "OK",
            MeasurementStatus::NoData => "NO_DATA",
            MeasurementStatus::Invalid => "INVALID",
            MeasurementStatus::LowQuality => "LOW_QUALITY",
            MeasurementStatus::Derived => "DERIVED",
            MeasurementStatus::Timeout => "TIMEOUT",
            MeasurementStatus::Error => "ERROR",
        }
    }

    /// Usable measurements feed Phase A; all others only count against coverage.
    pub fn is_usable(&self) -> bool {
        matches!(self, MeasurementStatus::Ok | MeasurementStatus::Derived)
    }

    /// Statuses that are allowed to carry a numeric value
    pub fn may_carry_value(&self) -> bool {
        matches!(self, MeasurementStatus::Ok | MeasurementStatus::Derived)
    }
}

impl std::fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// MEASUREMENT
// ============================================================================

/// One instrument measurement over a bounding box.
///
/// Immutable once produced; the pipeline only reads it. Construction never
/// fails - validation is a separate concern (`validate.rs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Instrument channel name (must match the instrument layout)
    pub instrument_name: String,
    /// What physical quantity was measured
    pub measurement_type: String,
    /// Numeric value. Present iff status is OK (required) or DERIVED (tolerated).
    pub value: Option<f64>,
    /// Physical unit of `value`
    pub unit: String,
    pub status: MeasurementStatus,
    /// Provider-stated confidence in [0,1]
    pub confidence: f32,
    /// Human-readable reason for a non-OK status
    pub reason: Option<String>,
    /// Provider quality flags (BTreeMap: deterministic ordering)
    pub quality_flags: BTreeMap<String, bool>,
    /// Data source / provider identifier
    pub source: String,
    pub acquisition_date: Option<DateTime<Utc>>,
    pub processing_notes: Vec<String>,
    /// Optional provider-side alert threshold
    pub threshold: Option<f64>,
    pub exceeds_threshold: Option<bool>,
}

impl Measurement {
    /// OK measurement with a finite value.
    /// The value is stored as given; the validator rejects NaN/Infinity.
    pub fn ok(
        instrument_name: &str,
        measurement_type: &str,
        value: f64,
        unit: &str,
        confidence: f32,
        source: &str,
    ) -> Self {
        Self {
            instrument_name: instrument_name.to_string(),
            measurement_type: measurement_type.to_string(),
            value: Some(value),
            unit: unit.to_string(),
            status: MeasurementStatus::Ok,
            confidence,
            reason: None,
            quality_flags: BTreeMap::new(),
            source: source.to_string(),
            acquisition_date: None,
            processing_notes: Vec::new(),
            threshold: None,
            exceeds_threshold: None,
        }
    }

    /// Derived measurement (computed from other channels). May carry a value.
    pub fn derived(
        instrument_name: &str,
        measurement_type: &str,
        value: f64,
        unit: &str,
        confidence: f32,
        source: &str,
    ) -> Self {
        let mut m = Self::ok(instrument_name, measurement_type, value, unit, confidence, source);
        m.status = MeasurementStatus::Derived;
        m
    }

    pub fn no_data(instrument_name: &str, source: &str, reason: &str) -> Self {
        Self::unavailable(instrument_name, source, MeasurementStatus::NoData, reason)
    }

    pub fn invalid(instrument_name: &str, source: &str, reason: &str) -> Self {
        Self::unavailable(instrument_name, source, MeasurementStatus::Invalid, reason)
    }

    pub fn low_quality(instrument_name: &str, source: &str, reason: &str) -> Self {
        Self::unavailable(instrument_name, source, MeasurementStatus::LowQuality, reason)
    }

    pub fn timeout(instrument_name: &str, source: &str, timeout_ms: u64) -> Self {
        Self::unavailable(
            instrument_name,
            source,
            MeasurementStatus::Timeout,
            &format!("Producer exceeded {timeout_ms} ms timeout"),
        )
    }

    pub fn error(instrument_name: &str, source: &str, reason: &str) -> Self {
        Self::unavailable(instrument_name, source, MeasurementStatus::Error, reason)
    }

    /// Shared factory for all value-less statuses.
    /// Non-OK/non-DERIVED measurements never carry a value (contract invariant).
    fn unavailable(
        instrument_name: &str,
        source: &str,
        status: MeasurementStatus,
        reason: &str,
    ) -> Self {
        Self {
            instrument_name: instrument_name.to_string(),
            measurement_type: String::new(),
            value: None,
            unit: String::new(),
            status,
            confidence: 0.0,
            reason: Some(reason.to_string()),
            quality_flags: BTreeMap::new(),
            source: source.to_string(),
            acquisition_date: None,
            processing_notes: Vec::new(),
            threshold: None,
            exceeds_threshold: None,
        }
    }

    /// Attach a quality flag (builder-style)
    pub fn with_quality_flag(mut self, name: &str, value: bool) -> Self {
        self.quality_flags.insert(name.to_string(), value);
        self
    }

    /// Attach an acquisition date (builder-style)
    pub fn with_acquisition_date(mut self, date: DateTime<Utc>) -> Self {
        self.acquisition_date = Some(date);
        self
    }

    /// Attach a processing note (builder-style)
    pub fn with_note(mut self, note: &str) -> Self {
        self.processing_notes.push(note.to_string());
        self
    }

    /// Attach a provider threshold and compute the exceeds flag
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self.exceeds_threshold = self.value.map(|v| v > threshold);
        self
    }

    /// Whether this measurement contributes to the feature vector
    pub fn is_usable(&self) -> bool {
        self.status.is_usable() && self.value.map(|v| v.is_finite()).unwrap_or(false)
    }

    /// JSON form for structured logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "instrument": self.instrument_name,
            "status": self.status.as_str(),
            "value": self.value,
            "unit": self.unit,
            "confidence": self.confidence,
            "source": self.source,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_factory_carries_value() {
        let m = Measurement::ok("ndvi", "vegetation_index", 0.42, "ratio", 0.9, "test");
        assert_eq!(m.status, MeasurementStatus::Ok);
        assert_eq!(m.value, Some(0.42));
        assert!(m.is_usable());
    }

    #[test]
    fn test_unavailable_factories_have_no_value() {
        let cases = [
            Measurement::no_data("ndvi", "test", "cloud cover"),
            Measurement::invalid("ndvi", "test", "bad tile"),
            Measurement::low_quality("ndvi", "test", "partial scene"),
            Measurement::timeout("ndvi", "test", 8000),
            Measurement::error("ndvi", "test", "provider 500"),
        ];
        for m in cases {
            assert!(m.value.is_none(), "{} must not carry a value", m.status);
            assert!(!m.is_usable());
            assert!(m.reason.is_some());
        }
    }

    #[test]
    fn test_status_usability() {
        assert!(MeasurementStatus::Ok.is_usable());
        assert!(MeasurementStatus::Derived.is_usable());
        assert!(!MeasurementStatus::Timeout.is_usable());
        assert!(!MeasurementStatus::NoData.is_usable());
    }

    #[test]
    fn test_threshold_flag() {
        let m = Measurement::ok("thermal_infrared", "temperature", 310.0, "K", 0.8, "test")
            .with_threshold(300.0);
        assert_eq!(m.exceeds_threshold, Some(true));

        let m = Measurement::ok("thermal_infrared", "temperature", 290.0, "K", 0.8, "test")
            .with_threshold(300.0);
        assert_eq!(m.exceeds_threshold, Some(false));
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&MeasurementStatus::LowQuality).unwrap();
        assert_eq!(json, "\"LOW_QUALITY\"");
    }
}
