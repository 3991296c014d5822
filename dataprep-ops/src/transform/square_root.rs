//! Square-root transformation

use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table};

use super::{map_numeric_column, numeric_target, NegativePolicy};

/// Registry descriptor for [`SquareRoot`]
pub const SPEC: OpSpec = OpSpec {
    key: "square_root",
    description: "Applies a square-root transformation",
    parameters: &[
        ("column", "The column to transform"),
        ("handle_negatives", "Negative-value policy: error, abs, or zero (default: error)"),
    ],
};

/// Takes the square root of a numeric column
pub struct SquareRoot;

impl Operation for SquareRoot {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let column = numeric_target(table, params)?;
        let policy = NegativePolicy::from_params(params)?;

        if policy == NegativePolicy::Error {
            if let Some(v) = column.numeric_values().find(|v| *v < 0.0) {
                return Err(Error::Computation(format!(
                    "column '{}' contains negative value {}; set handle_negatives to 'abs' or 'zero'",
                    column.name(),
                    v
                )));
            }
        }

        let result = map_numeric_column(table, column, |v| policy.adjust(v).sqrt())?;
        Ok(OpOutput::Table(result))
    }
}
