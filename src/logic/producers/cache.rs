//! Measurement Cache Collaborator
//!
//! An explicit, injected cache with a stated eviction policy, wrapped around
//! individual producers. The core pipeline itself stays cache-free - it is
//! purely derived from its inputs.

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::logic::measurement::Measurement;

use super::{BoundingBox, InstrumentProducer};

// ============================================================================
// CACHE TRAIT
// ============================================================================

pub trait MeasurementCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Measurement>;
    fn put(&self, key: &str, measurement: Measurement);
}

/// Cache key: instrument plus the bounding box at fixed precision, so
/// float noise below ~10 m never splits entries.
pub fn cache_key(instrument: &str, bbox: &BoundingBox) -> String {
    format!(
        "{instrument}:{:.4}:{:.4}:{:.4}:{:.4}",
        bbox.lat_min, bbox.lat_max, bbox.lon_min, bbox.lon_max
    )
}

// ============================================================================
// IN-MEMORY CACHE (bounded, oldest-inserted evicted)
// ============================================================================

struct CacheState {
    entries: BTreeMap<String, Measurement>,
    insertion_order: VecDeque<String>,
}

pub struct InMemoryMeasurementCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl InMemoryMeasurementCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(CacheState {
                entries: BTreeMap::new(),
                insertion_order: VecDeque::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryMeasurementCache {
    /// Deployment-level capacity: `ANTHROSCAN_CACHE_CAPACITY` when set,
    /// else `constants::DEFAULT_CACHE_CAPACITY`.
    fn default() -> Self {
        Self::new(crate::constants::get_cache_capacity())
    }
}

impl MeasurementCache for InMemoryMeasurementCache {
    fn get(&self, key: &str) -> Option<Measurement> {
        self.state.lock().entries.get(key).cloned()
    }

    fn put(&self, key: &str, measurement: Measurement) {
        let mut state = self.state.lock();
        if !state.entries.contains_key(key) {
            state.insertion_order.push_back(key.to_string());
        }
        state.entries.insert(key.to_string(), measurement);

        while state.entries.len() > self.capacity {
            // Oldest-inserted entry goes first
            if let Some(oldest) = state.insertion_order.pop_front() {
                state.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }
}

// ============================================================================
// CACHING PRODUCER WRAPPER
// ============================================================================

/// Wraps a producer with a cache. Only usable measurements are cached:
/// a timeout today should not shadow a successful fetch tomorrow.
pub struct CachedProducer<P> {
    inner: P,
    cache: Arc<dyn MeasurementCache>,
}

impl<P: InstrumentProducer> CachedProducer<P> {
    pub fn new(inner: P, cache: Arc<dyn MeasurementCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<P: InstrumentProducer> InstrumentProducer for CachedProducer<P> {
    fn instrument_name(&self) -> &str {
        self.inner.instrument_name()
    }

    async fn measure(&self, bbox: &BoundingBox) -> Result<Option<Measurement>, String> {
        let key = cache_key(self.instrument_name(), bbox);
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Cache hit for {key}");
            return Ok(Some(hit));
        }

        let result = self.inner.measure(bbox).await?;
        if let Some(m) = &result {
            if m.is_usable() {
                self.cache.put(&key, m.clone());
            }
        }
        Ok(result)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bbox() -> BoundingBox {
        BoundingBox { lat_min: 24.0, lat_max: 24.1, lon_min: 32.0, lon_max: 32.1 }
    }

    #[test]
    fn test_bounded_eviction_drops_oldest() {
        let cache = InMemoryMeasurementCache::new(2);
        let m = Measurement::ok("ndvi", "vegetation_index", 0.3, "ratio", 0.9, "test");
        cache.put("a", m.clone());
        cache.put("b", m.clone());
        cache.put("c", m.clone());

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_default_capacity_honors_env_override() {
        std::env::set_var("ANTHROSCAN_CACHE_CAPACITY", "2");
        let cache = InMemoryMeasurementCache::default();
        std::env::remove_var("ANTHROSCAN_CACHE_CAPACITY");

        let m = Measurement::ok("ndvi", "vegetation_index", 0.3, "ratio", 0.9, "test");
        cache.put("a", m.clone());
        cache.put("b", m.clone());
        cache.put("c", m);
        assert_eq!(cache.len(), 2);

        assert_eq!(
            InMemoryMeasurementCache::default().capacity,
            crate::constants::DEFAULT_CACHE_CAPACITY
        );
    }

    #[test]
    fn test_overwrite_does_not_grow() {
        let cache = InMemoryMeasurementCache::new(2);
        let m = Measurement::ok("ndvi", "vegetation_index", 0.3, "ratio", 0.9, "test");
        cache.put("a", m.clone());
        cache.put("a", m);
        assert_eq!(cache.len(), 1);
    }

    struct CountingProducer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InstrumentProducer for CountingProducer {
        fn instrument_name(&self) -> &str {
            "ndvi"
        }

        async fn measure(&self, _bbox: &BoundingBox) -> Result<Option<Measurement>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Measurement::ok("ndvi", "vegetation_index", 0.3, "ratio", 0.9, "test")))
        }
    }

    #[tokio::test]
    async fn test_cached_producer_skips_second_fetch() {
        let cache: Arc<dyn MeasurementCache> = Arc::new(InMemoryMeasurementCache::new(8));
        let producer = CachedProducer::new(
            CountingProducer { calls: AtomicUsize::new(0) },
            Arc::clone(&cache),
        );

        producer.measure(&bbox()).await.unwrap();
        producer.measure(&bbox()).await.unwrap();
        assert_eq!(producer.inner.calls.load(Ordering::SeqCst), 1);
    }

    struct FailingProducer;

    #[async_trait]
    impl InstrumentProducer for FailingProducer {
        fn instrument_name(&self) -> &str {
            "ndvi"
        }

        async fn measure(&self, _bbox: &BoundingBox) -> Result<Option<Measurement>, String> {
            Ok(Some(Measurement::error("ndvi", "test", "provider 500")))
        }
    }

    #[tokio::test]
    async fn test_unusable_measurements_not_cached() {
        let cache = Arc::new(InMemoryMeasurementCache::new(8));
        let producer = CachedProducer::new(
            FailingProducer,
            Arc::clone(&cache) as Arc<dyn MeasurementCache>,
        );
        producer.measure(&bbox()).await.unwrap();
        assert!(cache.is_empty());
    }
}
