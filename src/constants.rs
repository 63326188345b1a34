//! Central Configuration Constants
//!
//! Deployment-level defaults and their environment overrides. Pipeline
//! threshold constants live in `logic::config`; calibration tables in
//! `logic::normalize`.

pub use crate::logic::config::DEFAULT_PRODUCER_TIMEOUT_MS;

/// App name
pub const APP_NAME: &str = "AnthroScan";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default measurement-cache capacity (entries)
pub const DEFAULT_CACHE_CAPACITY: usize = 1_024;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Producer timeout from environment or default.
/// Consumed by `PipelineConfig::from_env`.
pub fn get_producer_timeout_ms() -> u64 {
    std::env::var("ANTHROSCAN_PRODUCER_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PRODUCER_TIMEOUT_MS)
}

/// Measurement-cache capacity from environment or default.
/// Consumed by `InMemoryMeasurementCache::default`.
pub fn get_cache_capacity() -> usize {
    std::env::var("ANTHROSCAN_CACHE_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CACHE_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(APP_NAME, "AnthroScan");
        assert!(DEFAULT_PRODUCER_TIMEOUT_MS > 0);
        assert!(DEFAULT_CACHE_CAPACITY > 0);
    }

    // Env-override behavior is covered where the overrides are consumed:
    // the timeout in `logic::config` tests, the capacity in
    // `logic::producers::cache` tests. One test per variable, so parallel
    // test threads never race on process environment.
}
