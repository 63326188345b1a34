//! Analysis Pipeline Orchestration
//!
//! One analysis is a short-lived, independent unit: one bounding box, one
//! environment lookup, a concurrent fan-out of instrument producers, then a
//! strictly sequential A->B->C->D->E->(strangeness)->F chain where each phase
//! is a pure function of the prior phase's output.
//!
//! The pipeline always returns a best-effort record; the only hard error is a
//! malformed request, surfaced before any phase runs. External collaborator
//! failures (classifier, history, known sites, sink) degrade and log, never
//! fail the run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::logic::anomaly;
use crate::logic::antipattern;
use crate::logic::config::PipelineConfig;
use crate::logic::environment::{EnvironmentClassification, EnvironmentClassifier};
use crate::logic::error::AnalysisError;
use crate::logic::history::{
    HistoricalContextProvider, HistoricalContextSummary, KnownSite, KnownSiteCatalog,
};
use crate::logic::inference;
use crate::logic::morphology;
use crate::logic::normalize::{self, BaselineTable};
use crate::logic::output::{self, AnalysisSnapshots, ScientificOutputRecord};
use crate::logic::persist::RecordSink;
use crate::logic::producers::{gather_measurements, BoundingBox, InstrumentProducer};
use crate::logic::strangeness;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Search radius for prior analyses around the region center
const HISTORY_RADIUS_KM: f64 = 25.0;

/// Search radius for catalogued known sites
const KNOWN_SITE_RADIUS_KM: f64 = 10.0;

// ============================================================================
// REQUEST
// ============================================================================

/// One analysis request: a bounding box plus naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub region_name: String,
    /// Stable candidate id; derived from region and box when absent
    pub candidate_id: Option<String>,
}

impl AnalysisRequest {
    /// Geometric validation. The only error class surfaced before any phase.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let bounds = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(AnalysisError::MalformedRequest(
                "Bounding box contains a non-finite coordinate".to_string(),
            ));
        }
        if self.lat_min >= self.lat_max {
            return Err(AnalysisError::MalformedRequest(format!(
                "lat_min {} must be below lat_max {}",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_min >= self.lon_max {
            return Err(AnalysisError::MalformedRequest(format!(
                "lon_min {} must be below lon_max {}",
                self.lon_min, self.lon_max
            )));
        }
        if !(-90.0..=90.0).contains(&self.lat_min) || !(-90.0..=90.0).contains(&self.lat_max) {
            return Err(AnalysisError::MalformedRequest(
                "Latitude outside [-90, 90]".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.lon_min) || !(-180.0..=180.0).contains(&self.lon_max) {
            return Err(AnalysisError::MalformedRequest(
                "Longitude outside [-180, 180]".to_string(),
            ));
        }
        if self.region_name.trim().is_empty() {
            return Err(AnalysisError::MalformedRequest(
                "Region name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            lat_min: self.lat_min,
            lat_max: self.lat_max,
            lon_min: self.lon_min,
            lon_max: self.lon_max,
        }
    }

    /// Deterministic: identical requests always name the same candidate
    pub fn effective_candidate_id(&self) -> String {
        match &self.candidate_id {
            Some(id) => id.clone(),
            None => format!(
                "{}:{:.4}:{:.4}:{:.4}:{:.4}",
                self.region_name, self.lat_min, self.lat_max, self.lon_min, self.lon_max
            ),
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Everything one analysis produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub record: ScientificOutputRecord,
    pub snapshots: AnalysisSnapshots,
}

// ============================================================================
// ENGINE
// ============================================================================

/// The analysis engine. Holds the external collaborators and the calibration
/// tables; each `analyze` call is independent and safe to run concurrently.
pub struct AnalysisEngine {
    producers: Vec<Arc<dyn InstrumentProducer>>,
    classifier: Arc<dyn EnvironmentClassifier>,
    history: Option<Arc<dyn HistoricalContextProvider>>,
    known_sites: Option<Arc<dyn KnownSiteCatalog>>,
    sink: Option<Arc<dyn RecordSink>>,
    baselines: BaselineTable,
    config: PipelineConfig,
}

impl AnalysisEngine {
    pub fn new(
        producers: Vec<Arc<dyn InstrumentProducer>>,
        classifier: Arc<dyn EnvironmentClassifier>,
    ) -> Self {
        Self {
            producers,
            classifier,
            history: None,
            known_sites: None,
            sink: None,
            baselines: BaselineTable::default_calibration(),
            config: PipelineConfig::default(),
        }
    }

    pub fn with_history(mut self, provider: Arc<dyn HistoricalContextProvider>) -> Self {
        self.history = Some(provider);
        self
    }

    pub fn with_known_sites(mut self, catalog: Arc<dyn KnownSiteCatalog>) -> Self {
        self.known_sites = Some(catalog);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_baselines(mut self, baselines: BaselineTable) -> Self {
        self.baselines = baselines;
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run one full analysis.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        request.validate()?;

        let candidate_id = request.effective_candidate_id();
        let bbox = request.bounding_box();
        let (lat, lon) = bbox.center();

        log::info!(
            "Analysis start: '{}' ({}) at ({:.4}, {:.4})",
            request.region_name,
            candidate_id,
            lat,
            lon
        );

        let environment = self.classify_environment(lat, lon).await;

        // Fan-out / fan-in of all producers
        let measurements = gather_measurements(&self.producers, bbox, &self.config).await;
        for m in measurements.values() {
            log::debug!("Measurement: {}", m.to_log_entry());
        }

        let historical_context = self.load_history(lat, lon).await;

        // Strictly sequential phase chain, each a pure function
        let features = normalize::normalize(
            &candidate_id,
            &measurements,
            &environment,
            &self.baselines,
            historical_context,
        );
        let anomaly = anomaly::detect(&features);
        let morphology = morphology::analyze(&features);
        let coverage = inference::compute_coverage(&measurements, environment.environment_type);
        let inference =
            inference::infer(&features, &anomaly, &morphology, &coverage, &self.config);
        let rejection = antipattern::screen(&features, &morphology, &inference, &self.config);
        let strangeness = strangeness::assess(&anomaly, &morphology, &coverage, &self.config);

        let snapshots = AnalysisSnapshots {
            features,
            anomaly,
            morphology,
            coverage,
            inference,
            rejection,
            strangeness,
        };

        let nearby_sites = self.load_known_sites(lat, lon).await;

        let record = output::assemble(
            &candidate_id,
            &request.region_name,
            &environment,
            &snapshots,
            &nearby_sites,
            &self.config,
        );

        // Persistence is best-effort: the record is returned regardless
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.append(&record, &snapshots).await {
                log::error!("Record sink failed for '{}': {e}", record.candidate_id);
            }
        }

        log::info!(
            "Analysis done: '{}' -> {} (anomaly {:.2}, combined {:.2}, action {})",
            candidate_id,
            record.candidate_type,
            record.anomaly_score,
            record.combined_anthropic_probability,
            record.recommended_action
        );

        Ok(AnalysisOutcome { record, snapshots })
    }

    // ------------------------------------------------------------------
    // Collaborator calls (all degrade, never fail the run)
    // ------------------------------------------------------------------

    async fn classify_environment(&self, lat: f64, lon: f64) -> EnvironmentClassification {
        match self.classifier.classify(lat, lon).await {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Environment classifier failed ({e}); using unknown environment");
                EnvironmentClassification::unknown()
            }
        }
    }

    async fn load_history(&self, lat: f64, lon: f64) -> Option<HistoricalContextSummary> {
        let provider = self.history.as_ref()?;
        match provider.prior_analyses(lat, lon, HISTORY_RADIUS_KM).await {
            Ok(records) => Some(HistoricalContextSummary::from_records(&records)),
            Err(e) => {
                log::warn!("Historical-context provider failed ({e}); continuing without");
                None
            }
        }
    }

    async fn load_known_sites(&self, lat: f64, lon: f64) -> Vec<KnownSite> {
        let Some(catalog) = self.known_sites.as_ref() else {
            return Vec::new();
        };
        match catalog.nearby_sites(lat, lon, KNOWN_SITE_RADIUS_KM).await {
            Ok(sites) => sites,
            Err(e) => {
                log::warn!("Known-site catalog failed ({e}); continuing without");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
