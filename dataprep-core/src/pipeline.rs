//! Sequential pipeline execution
//!
//! A pipeline is an ordered list of operation descriptors folded over a
//! table: each operation's output is the exact input of the next. Execution
//! is strictly sequential (every step depends on the previous output) and
//! all-or-nothing: the first failure aborts the run with the failing index
//! and type, leaving the caller's table untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;
use tracing::debug;

use crate::error::Error as CoreError;
use crate::operation::{OpOutput, Params};
use crate::registry::Registry;
use crate::table::Table;

/// One step of a pipeline request: an operation type plus its parameters
///
/// Deserializes from the flat JSON shape callers submit:
/// `{"type": "missing_values", "method": "mean", "columns": ["a"]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpDescriptor {
    /// Registry key of the operation; empty means missing
    #[serde(rename = "type", default)]
    pub op_type: String,

    /// Every descriptor field except `type`
    #[serde(flatten)]
    pub params: Map<String, Json>,
}

impl OpDescriptor {
    /// Create a descriptor with no parameters
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            params: Map::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A pipeline failure anchored to the operation that caused it
#[derive(Debug, Error)]
#[error("operation {index} ('{op_type}') failed: {source}")]
pub struct PipelineFailure {
    /// 0-based position of the failing descriptor
    pub index: usize,

    /// The descriptor's `type` field (empty when it was missing)
    pub op_type: String,

    /// The underlying error
    #[source]
    pub source: CoreError,
}

/// Result of a fully successful pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The final table after every operation was applied
    pub table: Table,

    /// Number of operations applied
    pub applied: usize,

    /// Result documents collected from report-producing operations, in
    /// pipeline order
    pub reports: Vec<Json>,
}

/// Applies ordered operation lists to tables, resolving each operation
/// through one registry
pub struct Executor<'a> {
    registry: &'a Registry,
}

impl<'a> Executor<'a> {
    /// Create an executor over a registry
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Run the pipeline
    ///
    /// Table-producing operations thread their output to the next step;
    /// report-producing operations leave the current table unchanged and
    /// their documents are collected into the outcome. The executor never
    /// persists anything.
    pub fn execute(
        &self,
        table: &Table,
        operations: &[OpDescriptor],
    ) -> Result<PipelineOutcome, PipelineFailure> {
        let mut current = table.clone();
        let mut reports = Vec::new();

        for (index, descriptor) in operations.iter().enumerate() {
            if descriptor.op_type.is_empty() {
                return Err(PipelineFailure {
                    index,
                    op_type: String::new(),
                    source: CoreError::MissingOperationType,
                });
            }

            let operation = self
                .registry
                .resolve(&descriptor.op_type)
                .map_err(|source| PipelineFailure {
                    index,
                    op_type: descriptor.op_type.clone(),
                    source,
                })?;

            let params = Params::new(&descriptor.params);
            match operation.apply(&current, &params) {
                Ok(OpOutput::Table(next)) => {
                    debug!(
                        index,
                        op_type = %descriptor.op_type,
                        rows = next.row_count(),
                        "pipeline step applied"
                    );
                    current = next;
                }
                Ok(OpOutput::Report(report)) => {
                    debug!(index, op_type = %descriptor.op_type, "pipeline step produced report");
                    reports.push(report);
                }
                Err(source) => {
                    return Err(PipelineFailure {
                        index,
                        op_type: descriptor.op_type.clone(),
                        source,
                    });
                }
            }
        }

        Ok(PipelineOutcome {
            table: current,
            applied: operations.len(),
            reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::error::Result;
    use crate::operation::{OpSpec, Operation};
    use crate::registry::{Family, Registration};
    use crate::value::Value;

    /// Appends its tag to the "trace" string column, recording application order.
    struct AppendTag(&'static str);

    impl Operation for AppendTag {
        fn apply(&self, table: &Table, _params: &Params<'_>) -> Result<OpOutput> {
            let trace = table
                .column("trace")
                .and_then(|c| c.get(0))
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let next = format!("{}{}", trace, self.0);
            let table = table
                .clone()
                .with_column(Column::new("trace", vec![next.into()]))?;
            Ok(OpOutput::Table(table))
        }
    }

    struct FailWith(fn() -> CoreError);

    impl Operation for FailWith {
        fn apply(&self, _table: &Table, _params: &Params<'_>) -> Result<OpOutput> {
            Err((self.0)())
        }
    }

    struct CountReport;

    impl Operation for CountReport {
        fn apply(&self, table: &Table, _params: &Params<'_>) -> Result<OpOutput> {
            Ok(OpOutput::Report(
                serde_json::json!({ "rows": table.row_count() }),
            ))
        }
    }

    const fn spec(key: &'static str) -> OpSpec {
        OpSpec {
            key,
            description: "test operation",
            parameters: &[],
        }
    }

    fn test_registry() -> Registry {
        Registry::new(
            Family::Cleaning,
            vec![
                Registration::new(spec("append_a"), || Box::new(AppendTag("a"))),
                Registration::new(spec("append_b"), || Box::new(AppendTag("b"))),
                Registration::new(spec("fail_invalid"), || {
                    Box::new(FailWith(|| {
                        CoreError::InvalidParameter("bad value".into())
                    }))
                }),
                Registration::new(spec("count"), || Box::new(CountReport)),
            ],
        )
    }

    fn trace_table() -> Table {
        Table::from_columns(vec![Column::new("trace", vec!["".into()])]).unwrap()
    }

    #[test]
    fn test_operations_apply_in_list_order() {
        let registry = test_registry();
        let executor = Executor::new(&registry);

        let ab = executor
            .execute(
                &trace_table(),
                &[OpDescriptor::new("append_a"), OpDescriptor::new("append_b")],
            )
            .unwrap();
        let ba = executor
            .execute(
                &trace_table(),
                &[OpDescriptor::new("append_b"), OpDescriptor::new("append_a")],
            )
            .unwrap();

        assert_eq!(ab.applied, 2);
        assert_eq!(
            ab.table.column("trace").unwrap().values()[0],
            Value::Str("ab".into())
        );
        assert_eq!(
            ba.table.column("trace").unwrap().values()[0],
            Value::Str("ba".into())
        );
    }

    #[test]
    fn test_failure_is_anchored_to_index_and_type() {
        let registry = test_registry();
        let executor = Executor::new(&registry);

        let failure = executor
            .execute(
                &trace_table(),
                &[
                    OpDescriptor::new("append_a"),
                    OpDescriptor::new("fail_invalid"),
                    OpDescriptor::new("append_b"),
                ],
            )
            .unwrap_err();

        assert_eq!(failure.index, 1);
        assert_eq!(failure.op_type, "fail_invalid");
        assert_eq!(failure.source.kind(), "InvalidParameter");
    }

    #[test]
    fn test_unknown_operation_failure() {
        let registry = test_registry();
        let executor = Executor::new(&registry);

        let failure = executor
            .execute(&trace_table(), &[OpDescriptor::new("does_not_exist")])
            .unwrap_err();

        assert_eq!(failure.index, 0);
        assert_eq!(failure.op_type, "does_not_exist");
        assert_eq!(failure.source.kind(), "UnknownOperation");
    }

    #[test]
    fn test_missing_type_failure() {
        let registry = test_registry();
        let executor = Executor::new(&registry);

        let failure = executor
            .execute(
                &trace_table(),
                &[OpDescriptor::new("append_a"), OpDescriptor::new("")],
            )
            .unwrap_err();

        assert_eq!(failure.index, 1);
        assert_eq!(failure.source.kind(), "MissingOperationType");
    }

    #[test]
    fn test_input_table_unchanged_on_failure() {
        let registry = test_registry();
        let executor = Executor::new(&registry);
        let table = trace_table();

        let _ = executor
            .execute(
                &table,
                &[OpDescriptor::new("append_a"), OpDescriptor::new("fail_invalid")],
            )
            .unwrap_err();

        assert_eq!(
            table.column("trace").unwrap().values()[0],
            Value::Str("".into())
        );
    }

    #[test]
    fn test_reports_keep_current_table() {
        let registry = test_registry();
        let executor = Executor::new(&registry);

        let outcome = executor
            .execute(
                &trace_table(),
                &[
                    OpDescriptor::new("append_a"),
                    OpDescriptor::new("count"),
                    OpDescriptor::new("append_b"),
                ],
            )
            .unwrap();

        assert_eq!(outcome.applied, 3);
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0]["rows"], 1);
        assert_eq!(
            outcome.table.column("trace").unwrap().values()[0],
            Value::Str("ab".into())
        );
    }

    #[test]
    fn test_descriptor_json_shape() {
        let descriptor: OpDescriptor = serde_json::from_str(
            r#"{"type": "missing_values", "method": "mean", "columns": ["a"]}"#,
        )
        .unwrap();

        assert_eq!(descriptor.op_type, "missing_values");
        assert_eq!(descriptor.params["method"], "mean");
        assert!(!descriptor.params.contains_key("type"));

        let missing: OpDescriptor = serde_json::from_str(r#"{"method": "mean"}"#).unwrap();
        assert!(missing.op_type.is_empty());
    }
}
