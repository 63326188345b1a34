//! Instrument Producer Boundary
//!
//! Producers are external, stateless async collaborators: one call per
//! (instrument, bounding box) returning a Measurement or nothing. This module
//! owns the fan-out/fan-in: every producer runs concurrently, each bounded by
//! a timeout with a small retry budget, and every outcome - including timeout
//! and panic - lands in the map as a Measurement. The pipeline never sees a
//! producer failure as an error.
//!
//! # Architecture
//! - `cache.rs`: injected cache collaborator wrapping individual producers

pub mod cache;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::logic::config::PipelineConfig;
use crate::logic::measurement::{validate, Measurement};

pub use cache::{CachedProducer, InMemoryMeasurementCache, MeasurementCache};

// ============================================================================
// BOUNDING BOX
// ============================================================================

/// Geographic bounding box of one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }
}

// ============================================================================
// PRODUCER TRAIT
// ============================================================================

/// External instrument-data producer. `Ok(None)` means the provider has
/// nothing for this region; transport failures are `Err`.
#[async_trait]
pub trait InstrumentProducer: Send + Sync {
    fn instrument_name(&self) -> &str;

    async fn measure(&self, bbox: &BoundingBox) -> Result<Option<Measurement>, String>;
}

// ============================================================================
// FAN-OUT / FAN-IN
// ============================================================================

/// Concurrently gather one measurement per producer.
///
/// Each producer gets `producer_retries + 1` attempts, each bounded by
/// `producer_timeout_ms`. Retries only follow transport errors and timeouts;
/// a clean "no data" answer is final. Measurements violating the contract
/// (e.g. OK with a non-finite value) are downgraded to ERROR at this
/// boundary, so the pipeline never sees an invalid one.
pub async fn gather_measurements(
    producers: &[Arc<dyn InstrumentProducer>],
    bbox: BoundingBox,
    config: &PipelineConfig,
) -> BTreeMap<String, Measurement> {
    let timeout = Duration::from_millis(config.producer_timeout_ms);
    let attempts = config.producer_retries + 1;

    let mut handles = Vec::with_capacity(producers.len());
    for producer in producers {
        let producer = Arc::clone(producer);
        let name = producer.instrument_name().to_string();
        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            run_producer(producer.as_ref(), &task_name, bbox, timeout, attempts).await
        });
        // Name stays on this side of the spawn so a panicking task still
        // has an instrument slot to land in
        handles.push((name, handle));
    }

    let mut measurements = BTreeMap::new();
    for (name, handle) in handles {
        let m = match handle.await {
            Ok(m) => m,
            Err(e) => {
                log::error!("Producer '{name}' panicked: {e}");
                Measurement::error(&name, "producer", "Producer panicked")
            }
        };
        measurements.insert(name, m);
    }
    measurements
}

async fn run_producer(
    producer: &dyn InstrumentProducer,
    name: &str,
    bbox: BoundingBox,
    timeout: Duration,
    attempts: u32,
) -> Measurement {
    let mut last_error: Option<String> = None;
    let mut timed_out = false;

    for attempt in 1..=attempts {
        match tokio::time::timeout(timeout, producer.measure(&bbox)).await {
            Ok(Ok(Some(m))) => return checked(m, name),
            Ok(Ok(None)) => {
                return Measurement::no_data(name, "producer", "Provider has no data for region");
            }
            Ok(Err(e)) => {
                log::warn!("Producer '{name}' attempt {attempt}/{attempts} failed: {e}");
                last_error = Some(e);
            }
            Err(_) => {
                log::warn!(
                    "Producer '{name}' attempt {attempt}/{attempts} exceeded {} ms",
                    timeout.as_millis()
                );
                timed_out = true;
            }
        }
    }

    if timed_out && last_error.is_none() {
        Measurement::timeout(name, "producer", timeout.as_millis() as u64)
    } else {
        Measurement::error(
            name,
            "producer",
            &last_error.unwrap_or_else(|| "Producer failed".to_string()),
        )
    }
}

/// Contract enforcement at the boundary: violations become ERROR.
fn checked(m: Measurement, name: &str) -> Measurement {
    let report = validate(&m);
    if report.valid {
        m
    } else {
        log::warn!(
            "Producer '{name}' violated the measurement contract: {}",
            report.violations.join("; ")
        );
        Measurement::error(
            name,
            &m.source,
            &format!("Contract violation: {}", report.violations.join("; ")),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
