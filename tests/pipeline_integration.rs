//! End-to-end pipeline tests with mocked external collaborators.

use std::sync::Arc;

use async_trait::async_trait;

use anthroscan_core::logic::environment::{
    EnvironmentClassification, EnvironmentClassifier, EnvironmentType,
};
use anthroscan_core::logic::inference::InferenceConfidence;
use anthroscan_core::logic::measurement::{Measurement, MeasurementStatus};
use anthroscan_core::logic::morphology::GeomorphologyHint;
use anthroscan_core::logic::normalize::{BaselineEntry, BaselineTable};
use anthroscan_core::logic::output::{RecommendedAction, ScientificConfidence};
use anthroscan_core::logic::persist::{MemorySink, RecordSink};
use anthroscan_core::logic::producers::{BoundingBox, InstrumentProducer};
use anthroscan_core::logic::antipattern::DiscardType;
use anthroscan_core::logic::inference::SiteClassification;
use anthroscan_core::{AnalysisEngine, AnalysisRequest, PipelineConfig};

// ============================================================================
// MOCK COLLABORATORS
// ============================================================================

struct FixedClassifier(EnvironmentType);

#[async_trait]
impl EnvironmentClassifier for FixedClassifier {
    async fn classify(&self, _lat: f64, _lon: f64) -> Result<EnvironmentClassification, String> {
        Ok(EnvironmentClassification {
            environment_type: self.0,
            confidence: 0.9,
            primary_sensors: vec![],
            secondary_sensors: vec![],
            archaeological_visibility: 0.7,
            preservation_potential: 0.8,
        })
    }
}

struct StaticProducer {
    name: &'static str,
    value: f64,
}

#[async_trait]
impl InstrumentProducer for StaticProducer {
    fn instrument_name(&self) -> &str {
        self.name
    }

    async fn measure(&self, _bbox: &BoundingBox) -> Result<Option<Measurement>, String> {
        Ok(Some(Measurement::ok(self.name, "test", self.value, "unit", 0.9, "mock")))
    }
}

struct HangingProducer(&'static str);

#[async_trait]
impl InstrumentProducer for HangingProducer {
    fn instrument_name(&self) -> &str {
        self.0
    }

    async fn measure(&self, _bbox: &BoundingBox) -> Result<Option<Measurement>, String> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(None)
    }
}

fn producers(values: &[(&'static str, f64)]) -> Vec<Arc<dyn InstrumentProducer>> {
    values
        .iter()
        .map(|(name, value)| {
            Arc::new(StaticProducer { name, value: *value }) as Arc<dyn InstrumentProducer>
        })
        .collect()
}

/// Calibration whose means sit exactly on the provided values, so every
/// weighted z-score is zero.
fn baselines_at(values: &[(&'static str, f64)]) -> BaselineTable {
    let mut t = BaselineTable::empty();
    for (name, value) in values {
        t.set_global(name, BaselineEntry::new(*value, 0.2));
    }
    t
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        lat_min: 24.0,
        lat_max: 24.1,
        lon_min: 32.0,
        lon_max: 32.1,
        region_name: "Western Desert".to_string(),
        candidate_id: Some("candidate-1".to_string()),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[tokio::test]
async fn ancient_structure_without_modern_signal() {
    // Strong shape evidence on a basal desert surface, every channel exactly
    // on baseline: zero anomaly must still yield a historical structure.
    let values = [
        ("sar_coherence", 0.85),
        ("surface_planarity", 0.85),
        ("vegetation_regularity", 0.75),
        ("elevation_roughness", 0.4),
        ("ndvi", 0.08),
    ];
    let engine = AnalysisEngine::new(
        producers(&values),
        Arc::new(FixedClassifier(EnvironmentType::Desert)),
    )
    .with_baselines(baselines_at(&values));

    let outcome = engine.analyze(&request()).await.unwrap();

    assert_eq!(outcome.snapshots.anomaly.score, 0.0);
    assert_eq!(
        outcome.snapshots.morphology.geomorphology_hint,
        GeomorphologyHint::SurfacePatternAnthropicPossible
    );
    assert!(outcome.snapshots.inference.origin.value >= 0.6);
    assert!(outcome.snapshots.inference.activity.value <= 0.4);
    assert_eq!(
        outcome.snapshots.inference.site_classification,
        SiteClassification::HistoricalStructure
    );

    // Text consistency: never claim detection at zero score
    assert!(!outcome.record.notes.contains("anomaly detected"));
    assert!(outcome.record.notes.contains("No statistical anomaly present"));
}

#[tokio::test]
async fn glacial_moraine_archived_as_labeled_negative() {
    let values = [
        ("sar_coherence", 0.30),
        ("vegetation_regularity", 0.60),
        ("surface_planarity", 0.40),
        ("elevation_roughness", 2.0),
    ];
    let engine = AnalysisEngine::new(
        producers(&values),
        Arc::new(FixedClassifier(EnvironmentType::IceSheet)),
    )
    .with_baselines(baselines_at(&values));

    let outcome = engine.analyze(&request()).await.unwrap();

    let rejection = outcome.snapshots.rejection.expect("rejection expected");
    assert_eq!(rejection.pattern_name, "glacial_moraine");
    assert_eq!(outcome.record.discard_type, DiscardType::ArchiveScientificNegative);
    assert_eq!(outcome.record.recommended_action, RecommendedAction::ArchiveAsNegative);
    assert!(matches!(
        outcome.record.scientific_confidence,
        ScientificConfidence::High | ScientificConfidence::MediumHigh
    ));
    assert_eq!(outcome.record.candidate_type, "glacial_moraine");
}

#[tokio::test(start_paused = true)]
async fn timeouts_degrade_coverage_never_fail() {
    let mut all: Vec<Arc<dyn InstrumentProducer>> =
        producers(&[("sar_coherence", 0.5), ("ndvi", 0.3)]);
    all.push(Arc::new(HangingProducer("thermal_infrared")));
    all.push(Arc::new(HangingProducer("nightlights")));
    all.push(Arc::new(HangingProducer("soil_moisture")));
    all.push(Arc::new(HangingProducer("magnetic_gradient")));

    let engine = AnalysisEngine::new(all, Arc::new(FixedClassifier(EnvironmentType::Grassland)))
        .with_config(PipelineConfig {
            producer_timeout_ms: 50,
            ..Default::default()
        });

    let outcome = engine.analyze(&request()).await.unwrap();

    let features = &outcome.snapshots.features;
    assert!(features.get("thermal_infrared").is_none());
    assert_eq!(outcome.snapshots.coverage.instruments_available, 6);
    assert_eq!(outcome.snapshots.coverage.instruments_measured, 2);
    assert!(outcome.snapshots.coverage.effective < 0.4);
    // Below-threshold coverage must never produce high confidence
    assert_ne!(
        outcome.snapshots.inference.inference_confidence,
        InferenceConfidence::High
    );
    assert!(outcome.record.notes.contains("Insufficient instrument coverage"));
}

#[tokio::test]
async fn identical_inputs_reproduce_byte_identical_records() {
    let values = [
        ("sar_coherence", 0.55),
        ("ndvi", 0.25),
        ("thermal_infrared", 295.0),
        ("nightlights", 2.0),
    ];
    let engine = AnalysisEngine::new(
        producers(&values),
        Arc::new(FixedClassifier(EnvironmentType::Grassland)),
    );

    let a = engine.analyze(&request()).await.unwrap();
    let b = engine.analyze(&request()).await.unwrap();

    assert_eq!(
        serde_json::to_string(&a.record).unwrap(),
        serde_json::to_string(&b.record).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&a.snapshots).unwrap(),
        serde_json::to_string(&b.snapshots).unwrap()
    );
}

#[tokio::test]
async fn malformed_request_rejected_before_any_phase() {
    let sink = Arc::new(MemorySink::new());
    let engine = AnalysisEngine::new(
        producers(&[("ndvi", 0.3)]),
        Arc::new(FixedClassifier(EnvironmentType::Grassland)),
    )
    .with_sink(Arc::clone(&sink) as Arc<dyn RecordSink>);

    let mut bad = request();
    bad.lat_min = 25.0; // above lat_max

    assert!(engine.analyze(&bad).await.is_err());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn reanalysis_appends_independent_records() {
    let sink = Arc::new(MemorySink::new());
    let engine = AnalysisEngine::new(
        producers(&[("sar_coherence", 0.5), ("ndvi", 0.3)]),
        Arc::new(FixedClassifier(EnvironmentType::Desert)),
    )
    .with_sink(Arc::clone(&sink) as Arc<dyn RecordSink>);

    engine.analyze(&request()).await.unwrap();
    engine.analyze(&request()).await.unwrap();

    let all = sink.all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].record.record_id, all[1].record.record_id);
}

#[tokio::test]
async fn environment_classifier_failure_degrades_to_unknown() {
    struct BrokenClassifier;

    #[async_trait]
    impl EnvironmentClassifier for BrokenClassifier {
        async fn classify(
            &self,
            _lat: f64,
            _lon: f64,
        ) -> Result<EnvironmentClassification, String> {
            Err("classifier offline".to_string())
        }
    }

    let engine = AnalysisEngine::new(
        producers(&[("sar_coherence", 0.5), ("ndvi", 0.3)]),
        Arc::new(BrokenClassifier),
    );

    let outcome = engine.analyze(&request()).await.unwrap();
    assert_eq!(outcome.record.environment.environment_type, EnvironmentType::Unknown);
}

#[tokio::test]
async fn every_producer_outcome_lands_in_snapshot_statuses() {
    struct EmptyProducer;

    #[async_trait]
    impl InstrumentProducer for EmptyProducer {
        fn instrument_name(&self) -> &str {
            "magnetic_gradient"
        }
        async fn measure(&self, _b: &BoundingBox) -> Result<Option<Measurement>, String> {
            Ok(None)
        }
    }

    let mut all: Vec<Arc<dyn InstrumentProducer>> = producers(&[("ndvi", 0.3)]);
    all.push(Arc::new(EmptyProducer));

    let engine =
        AnalysisEngine::new(all, Arc::new(FixedClassifier(EnvironmentType::Grassland)));
    let outcome = engine.analyze(&request()).await.unwrap();

    // NO_DATA excluded from features but counted against coverage
    assert!(outcome.snapshots.features.get("magnetic_gradient").is_none());
    assert_eq!(outcome.snapshots.coverage.instruments_available, 2);
    assert_eq!(outcome.snapshots.coverage.instruments_measured, 1);

    // Status taxonomy is closed; NoData is one of its 7 kinds
    assert!(MeasurementStatus::NoData.as_str() == "NO_DATA");
}
