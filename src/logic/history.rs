//! Historical Context & Known-Site Collaborators
//!
//! Optional external enrichment. Prior analyses feed anti-pattern
//! corroboration; known sites only ANNOTATE the output record (rediscovery
//! flag) and never alter computed probabilities.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// PRIOR ANALYSES
// ============================================================================

/// Summary of a previously persisted output record near a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorRecordSummary {
    pub candidate_id: String,
    pub distance_km: f64,
    pub anomaly_score: f32,
    pub combined_anthropic_probability: f32,
    /// Anti-pattern name if the prior analysis was rejected (e.g. "glacial_moraine")
    pub rejected_pattern: Option<String>,
}

/// Aggregate view of the local history, carried by the feature set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalContextSummary {
    pub prior_count: usize,
    pub mean_anomaly: f32,
    /// Prior rejection counts per anti-pattern name (BTreeMap: deterministic)
    pub rejection_counts: BTreeMap<String, usize>,
}

impl HistoricalContextSummary {
    pub fn from_records(records: &[PriorRecordSummary]) -> Self {
        let prior_count = records.len();
        let mean_anomaly = if prior_count > 0 {
            records.iter().map(|r| r.anomaly_score).sum::<f32>() / prior_count as f32
        } else {
            0.0
        };
        let mut rejection_counts: BTreeMap<String, usize> = BTreeMap::new();
        for pattern in records.iter().filter_map(|r| r.rejected_pattern.as_deref()) {
            *rejection_counts.entry(pattern.to_string()).or_insert(0) += 1;
        }
        Self { prior_count, mean_anomaly, rejection_counts }
    }

    /// How many prior analyses nearby were rejected with the given pattern
    pub fn corroborations(&self, pattern: &str) -> usize {
        self.rejection_counts.get(pattern).copied().unwrap_or(0)
    }
}

/// Optional collaborator: prior output-record summaries around a point
#[async_trait]
pub trait HistoricalContextProvider: Send + Sync {
    async fn prior_analyses(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<PriorRecordSummary>, String>;
}

// ============================================================================
// KNOWN SITES
// ============================================================================

/// A known (catalogued) site near the analyzed region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownSite {
    pub name: String,
    pub site_type: String,
    pub confidence_level: String,
    pub distance_km: f64,
}

/// Optional collaborator: catalogued sites around a point.
/// Annotation only - never consulted by any scoring phase.
#[async_trait]
pub trait KnownSiteCatalog: Send + Sync {
    async fn nearby_sites(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<KnownSite>, String>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn prior(id: &str, anomaly: f32, pattern: Option<&str>) -> PriorRecordSummary {
        PriorRecordSummary {
            candidate_id: id.to_string(),
            distance_km: 2.0,
            anomaly_score: anomaly,
            combined_anthropic_probability: 0.2,
            rejected_pattern: pattern.map(|p| p.to_string()),
        }
    }

    #[test]
    fn test_summary_from_empty() {
        let s = HistoricalContextSummary::from_records(&[]);
        assert_eq!(s.prior_count, 0);
        assert_eq!(s.mean_anomaly, 0.0);
        assert!(s.rejection_counts.is_empty());
    }

    #[test]
    fn test_summary_aggregates() {
        let records = vec![
            prior("a", 0.2, Some("glacial_moraine")),
            prior("b", 0.4, Some("glacial_moraine")),
            prior("c", 0.6, None),
        ];
        let s = HistoricalContextSummary::from_records(&records);
        assert_eq!(s.prior_count, 3);
        assert!((s.mean_anomaly - 0.4).abs() < 1e-6);
        assert_eq!(s.corroborations("glacial_moraine"), 2);
        assert_eq!(s.corroborations("aeolian_dune_field"), 0);
    }
}
