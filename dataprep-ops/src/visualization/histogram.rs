//! Histogram binning

use dataprep_core::{DataType, Error, OpOutput, OpSpec, Operation, Params, Result, Table};
use serde_json::json;

use crate::stats;

/// Registry descriptor for [`Histogram`]
pub const SPEC: OpSpec = OpSpec {
    key: "histogram",
    description: "Bins a numeric column into equal-width intervals",
    parameters: &[
        ("column", "The column to bin"),
        ("bins", "Number of equal-width bins (default: 10)"),
    ],
};

/// Reports equal-width bin edges and per-bin counts for one numeric column
pub struct Histogram;

impl Operation for Histogram {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let name = params.required_str("column")?;
        let column = table.column(name).ok_or_else(|| {
            Error::InvalidParameter(format!("column '{}' not found in table", name))
        })?;
        if !column.is_numeric() && column.data_type() != DataType::Null {
            return Err(Error::InvalidParameter(format!(
                "column '{}' is not numeric",
                name
            )));
        }
        let bins = params.usize_or("bins", 10)?;
        if bins == 0 {
            return Err(Error::InvalidParameter(
                "'bins' must be at least 1".to_string(),
            ));
        }

        let values: Vec<f64> = column.numeric_values().collect();
        let (min, max) = stats::min_max(&values).ok_or_else(|| {
            Error::Computation(format!(
                "cannot bin column '{}': no numeric values",
                name
            ))
        })?;

        // A constant column collapses into one bin holding every value.
        let (edges, counts) = if min == max {
            (vec![min, max], vec![values.len()])
        } else {
            let width = (max - min) / bins as f64;
            let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
            let mut counts = vec![0usize; bins];
            for v in &values {
                let index = (((v - min) / width) as usize).min(bins - 1);
                counts[index] += 1;
            }
            (edges, counts)
        };

        Ok(OpOutput::Report(json!({
            "column": name,
            "bins": counts.len(),
            "bin_edges": edges,
            "counts": counts,
            "total": values.len(),
        })))
    }
}
