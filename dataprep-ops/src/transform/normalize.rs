//! Min-max normalization

use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table};

use super::{map_numeric_column, numeric_target};
use crate::stats;

/// Registry descriptor for [`Normalize`]
pub const SPEC: OpSpec = OpSpec {
    key: "normalize",
    description: "Applies min-max normalization, scaling values into a range",
    parameters: &[
        ("column", "The column to transform"),
        ("range_min", "Minimum value for scaling (default: 0)"),
        ("range_max", "Maximum value for scaling (default: 1)"),
    ],
};

/// Scales a numeric column linearly into `[range_min, range_max]`
pub struct Normalize;

impl Operation for Normalize {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let column = numeric_target(table, params)?;
        let range_min = params.f64_or("range_min", 0.0)?;
        let range_max = params.f64_or("range_max", 1.0)?;

        let values: Vec<f64> = column.numeric_values().collect();
        let (min, max) = stats::min_max(&values).ok_or_else(|| {
            Error::Computation(format!(
                "cannot normalize column '{}': no numeric values",
                column.name()
            ))
        })?;
        if min == max {
            return Err(Error::Computation(format!(
                "cannot normalize column '{}': all values are identical",
                column.name()
            )));
        }

        let scale = (range_max - range_min) / (max - min);
        let result =
            map_numeric_column(table, column, |v| (v - min) * scale + range_min)?;
        Ok(OpOutput::Table(result))
    }
}
