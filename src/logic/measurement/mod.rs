//! Measurement Module - The Instrument Measurement Contract
//!
//! Canonical structure + status taxonomy that every instrument-data producer
//! must satisfy before its output enters the pipeline.
//!
//! # Architecture
//! - `types.rs`: `Measurement`, `MeasurementStatus`, per-status factories
//! - `validate.rs`: contract validator (boolean verdict + warnings)
//!
//! # Failure Strategy
//! Construction never fails. A measurement that fails validation is treated
//! as status ERROR at the pipeline boundary and excluded from coverage.

pub mod types;
pub mod validate;

pub use types::{Measurement, MeasurementStatus};
pub use validate::{validate, ValidationReport};
