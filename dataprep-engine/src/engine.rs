//! Pipeline orchestration over a dataset store

use dataprep_core::{
    DatasetStore, Error as CoreError, Executor, OpDescriptor, OpInfo, PipelineFailure,
    Registry,
};
use serde::Serialize;
use serde_json::Value as Json;
use thiserror::Error;
use tracing::{info, warn};

/// What can go wrong while running a pipeline against a store
#[derive(Debug, Error)]
pub enum EngineError {
    /// Loading or saving the dataset failed
    #[error("store error for dataset '{dataset}': {source}")]
    Store {
        /// The dataset involved
        dataset: String,
        /// The underlying error
        #[source]
        source: CoreError,
    },

    /// An operation in the pipeline failed
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
}

/// Client-facing description of a pipeline failure
#[derive(Debug, Clone, Serialize)]
pub struct PipelineErrorReport {
    /// 0-based index of the failing operation
    pub failed_at_index: usize,

    /// The failing operation's type (empty when it was missing)
    pub operation_type: String,

    /// Stable error taxonomy kind
    pub error_kind: &'static str,

    /// Human-readable message
    pub message: String,
}

impl From<&PipelineFailure> for PipelineErrorReport {
    fn from(failure: &PipelineFailure) -> Self {
        Self {
            failed_at_index: failure.index,
            operation_type: failure.op_type.clone(),
            error_kind: failure.source.kind(),
            message: failure.source.to_string(),
        }
    }
}

/// Summary of a fully successful pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// The dataset the pipeline ran against
    pub dataset: String,

    /// Number of operations applied
    pub applied_count: usize,

    /// Row count of the persisted result
    pub final_row_count: usize,

    /// Column count of the persisted result
    pub final_column_count: usize,

    /// Documents produced by report operations, in pipeline order
    pub reports: Vec<Json>,
}

/// Runs pipelines against named datasets, persisting results only on full
/// success
///
/// A failed pipeline leaves the stored dataset exactly as it was: the engine
/// loads, executes against the in-memory copy, and saves last.
pub struct Engine<S> {
    store: S,
}

impl<S: DatasetStore> Engine<S> {
    /// Create an engine over a dataset store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load `dataset`, run `operations` against `registry`, and persist the
    /// result
    ///
    /// Nothing is saved unless every operation succeeds.
    pub fn run_pipeline(
        &self,
        registry: &Registry,
        dataset: &str,
        operations: &[OpDescriptor],
    ) -> Result<PipelineReport, EngineError> {
        let table = self.store.load(dataset).map_err(|source| EngineError::Store {
            dataset: dataset.to_string(),
            source,
        })?;

        let outcome = Executor::new(registry)
            .execute(&table, operations)
            .map_err(|failure| {
                warn!(
                    dataset,
                    index = failure.index,
                    op_type = %failure.op_type,
                    kind = failure.source.kind(),
                    "pipeline failed, dataset left unchanged"
                );
                failure
            })?;

        self.store
            .save(dataset, &outcome.table)
            .map_err(|source| EngineError::Store {
                dataset: dataset.to_string(),
                source,
            })?;
        info!(
            dataset,
            applied = outcome.applied,
            rows = outcome.table.row_count(),
            "pipeline applied and persisted"
        );

        Ok(PipelineReport {
            dataset: dataset.to_string(),
            applied_count: outcome.applied,
            final_row_count: outcome.table.row_count(),
            final_column_count: outcome.table.column_count(),
            reports: outcome.reports,
        })
    }
}

/// Every operation available across the family registries, keyed by family
pub fn available_operations() -> Vec<(&'static str, Vec<OpInfo>)> {
    dataprep_ops::all_registries()
        .into_iter()
        .map(|registry| (registry.family().as_str(), registry.list_operations()))
        .collect()
}
