//! Logarithmic transformation

use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table};

use super::{map_numeric_column, numeric_target, NegativePolicy};

/// Registry descriptor for [`Log`]
pub const SPEC: OpSpec = OpSpec {
    key: "log",
    description: "Applies a log(x + 1) transformation",
    parameters: &[
        ("column", "The column to transform"),
        ("base", "Logarithm base: natural, 10, or 2 (default: natural)"),
        ("handle_negatives", "Negative-value policy: error, abs, or zero (default: error)"),
    ],
};

/// Applies `log(x + 1)` in the chosen base to a numeric column
///
/// The `+ 1` shift keeps zeros finite. Negative values are handled by the
/// `handle_negatives` policy before the shift.
pub struct Log;

impl Operation for Log {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let column = numeric_target(table, params)?;
        let policy = NegativePolicy::from_params(params)?;

        let log_fn: fn(f64) -> f64 = match params.str_or("base", "natural")? {
            "natural" => f64::ln,
            "10" => f64::log10,
            "2" => f64::log2,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "invalid 'base' value '{}': must be 'natural', '10', or '2'",
                    other
                )))
            }
        };

        if policy == NegativePolicy::Error {
            if let Some(v) = column.numeric_values().find(|v| *v < 0.0) {
                return Err(Error::Computation(format!(
                    "column '{}' contains negative value {}; set handle_negatives to 'abs' or 'zero'",
                    column.name(),
                    v
                )));
            }
        }

        let result =
            map_numeric_column(table, column, |v| log_fn(policy.adjust(v) + 1.0))?;
        Ok(OpOutput::Table(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataprep_core::{Column, Value};
    use serde_json::{json, Map};

    fn apply(table: &Table, params_json: serde_json::Value) -> Result<Table> {
        let map: Map<String, serde_json::Value> = serde_json::from_value(params_json).unwrap();
        Ok(Log.apply(table, &Params::new(&map))?.into_table().unwrap())
    }

    fn floats(table: &Table, name: &str) -> Vec<f64> {
        table
            .column(name)
            .unwrap()
            .values()
            .iter()
            .filter_map(|v| v.as_f64())
            .collect()
    }

    #[test]
    fn test_natural_log_shifts_by_one() {
        let table = Table::from_columns(vec![Column::new(
            "x",
            vec![0i64.into(), Value::Float(std::f64::consts::E - 1.0)],
        )])
        .unwrap();

        let result = apply(&table, json!({"column": "x"})).unwrap();
        let values = floats(&result, "x");
        assert!((values[0] - 0.0).abs() < 1e-12);
        assert!((values[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_base_10_and_2() {
        let table =
            Table::from_columns(vec![Column::new("x", vec![99i64.into()])]).unwrap();

        let ten = apply(&table, json!({"column": "x", "base": "10"})).unwrap();
        assert!((floats(&ten, "x")[0] - 2.0).abs() < 1e-12);

        let table =
            Table::from_columns(vec![Column::new("x", vec![7i64.into()])]).unwrap();
        let two = apply(&table, json!({"column": "x", "base": "2"})).unwrap();
        assert!((floats(&two, "x")[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_value_errors_by_default() {
        let table = Table::from_columns(vec![Column::new(
            "x",
            vec![1i64.into(), Value::Int(-2)],
        )])
        .unwrap();

        let err = apply(&table, json!({"column": "x"})).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_abs_policy() {
        let table =
            Table::from_columns(vec![Column::new("x", vec![Value::Int(-9)])]).unwrap();
        let result =
            apply(&table, json!({"column": "x", "base": "10", "handle_negatives": "abs"}))
                .unwrap();
        assert!((floats(&result, "x")[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_policy_clamps() {
        let table =
            Table::from_columns(vec![Column::new("x", vec![Value::Int(-9)])]).unwrap();
        let result =
            apply(&table, json!({"column": "x", "handle_negatives": "zero"})).unwrap();
        assert_eq!(floats(&result, "x")[0], 0.0);
    }

    #[test]
    fn test_invalid_base_rejected() {
        let table =
            Table::from_columns(vec![Column::new("x", vec![1i64.into()])]).unwrap();
        let err = apply(&table, json!({"column": "x", "base": "e"})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }
}
