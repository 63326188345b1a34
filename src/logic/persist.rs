//! Persistence Boundary
//!
//! Storage-agnostic append-only sink for output records and their phase
//! snapshots. A sink failure never fails an analysis: the caller logs it and
//! still returns the record.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::logic::error::SinkError;
use crate::logic::instruments::{validate_layout, LayoutMismatchError};
use crate::logic::normalize::NormalizedFeatureSet;
use crate::logic::output::{AnalysisSnapshots, ScientificOutputRecord};

// ============================================================================
// SINK TRAIT
// ============================================================================

/// One persisted unit: the record plus its phase snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedAnalysis {
    pub record: ScientificOutputRecord,
    pub snapshots: AnalysisSnapshots,
}

impl PersistedAnalysis {
    /// The persisted feature set, guarded by the instrument-layout check.
    ///
    /// An archived entry may predate a layout change; its z-scores would then
    /// be keyed against a different channel schema. Replay consumers go
    /// through this accessor so a stale entry surfaces as a
    /// `LayoutMismatchError` instead of silently misread features.
    pub fn feature_set(&self) -> Result<&NormalizedFeatureSet, LayoutMismatchError> {
        let features = &self.snapshots.features;
        validate_layout(features.feature_version, features.layout_hash)?;
        Ok(features)
    }
}

/// Append-only sink. Implementations must never mutate or delete previously
/// appended entries.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(
        &self,
        record: &ScientificOutputRecord,
        snapshots: &AnalysisSnapshots,
    ) -> Result<(), SinkError>;
}

// ============================================================================
// IN-MEMORY SINK
// ============================================================================

/// In-memory append-only sink. Used in tests and as the default when no
/// external storage is wired in.
pub struct MemorySink {
    entries: RwLock<Vec<PersistedAnalysis>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self { entries: RwLock::new(Vec::new()) }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of all appended entries, in append order
    pub fn all(&self) -> Vec<PersistedAnalysis> {
        self.entries.read().clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append(
        &self,
        record: &ScientificOutputRecord,
        snapshots: &AnalysisSnapshots,
    ) -> Result<(), SinkError> {
        self.entries.write().push(PersistedAnalysis {
            record: record.clone(),
            snapshots: snapshots.clone(),
        });
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
