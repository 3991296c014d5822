//! Outlier detection and replacement

use dataprep_core::{Column, Error, OpOutput, OpSpec, Operation, Params, Result, Table, Value};
use tracing::warn;

use crate::stats;

/// Name of the boolean flag column added by detection
pub const OUTLIER_FLAG_COLUMN: &str = "_is_outlier";

/// Registry descriptor for [`DetectOutliers`]
pub const DETECT_SPEC: OpSpec = OpSpec {
    key: "detect_outliers",
    description: "Flags outlier rows in a boolean column",
    parameters: &[
        ("method", "Detection method: std or iqr (default: std)"),
        ("n_std", "Standard-deviation multiplier for std (default: 3.0)"),
        ("columns", "Columns to check (default: all numeric columns)"),
    ],
};

/// Registry descriptor for [`ReplaceOutliers`]
pub const REPLACE_SPEC: OpSpec = OpSpec {
    key: "replace_outliers",
    description: "Replaces outlier cells with a statistic of the non-outlier values",
    parameters: &[
        ("method", "Detection method: std or iqr (default: std)"),
        ("n_std", "Standard-deviation multiplier for std (default: 3.0)"),
        ("replace_with", "Replacement statistic: mean, median, or mode (default: mean)"),
        ("columns", "Columns to process (default: all numeric columns)"),
    ],
};

/// Detection parameters shared by both operations
struct Detection {
    method: &'static str,
    n_std: f64,
    columns: Vec<String>,
}

impl Detection {
    fn from_params(table: &Table, params: &Params<'_>) -> Result<Self> {
        let method = match params.str_or("method", "std")? {
            "std" => "std",
            "iqr" => "iqr",
            other => {
                return Err(Error::InvalidParameter(format!(
                    "invalid 'method' value '{}': must be 'std' or 'iqr'",
                    other
                )))
            }
        };
        let n_std = params.f64_or("n_std", 3.0)?;
        let columns = numeric_targets(table, params.str_list("columns")?);
        Ok(Self {
            method,
            n_std,
            columns,
        })
    }

    /// One flag per row: true when any processed column puts the row outside
    /// its bounds. Columns with undefined spread are skipped, never an error.
    fn mask(&self, table: &Table) -> Vec<bool> {
        let mut mask = vec![false; table.row_count()];
        if self.columns.is_empty() {
            warn!("no valid numeric columns for outlier detection");
            return mask;
        }

        for name in &self.columns {
            let Some(column) = table.column(name) else { continue };
            let values: Vec<f64> = column.numeric_values().collect();

            let bounds = match self.method {
                "std" => std_bounds(&values, self.n_std),
                _ => iqr_bounds(&values),
            };
            let Some((lower, upper)) = bounds else {
                warn!(column = %name, method = self.method, "spread undefined, skipping column");
                continue;
            };

            for (row, value) in column.values().iter().enumerate() {
                if let Some(v) = value.as_f64() {
                    if v < lower || v > upper {
                        mask[row] = true;
                    }
                }
            }
        }
        mask
    }
}

fn numeric_targets(table: &Table, requested: Option<Vec<String>>) -> Vec<String> {
    match requested {
        Some(columns) => columns
            .into_iter()
            .filter(|name| table.column(name).map_or(false, Column::is_numeric))
            .collect(),
        None => table.numeric_column_names(),
    }
}

fn std_bounds(values: &[f64], n_std: f64) -> Option<(f64, f64)> {
    let mean = stats::mean(values)?;
    let std = stats::std_dev(values)?;
    if std == 0.0 {
        return None;
    }
    Some((mean - n_std * std, mean + n_std * std))
}

fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let q1 = stats::quantile(values, 0.25)?;
    let q3 = stats::quantile(values, 0.75)?;
    let iqr = q3 - q1;
    if iqr == 0.0 {
        return None;
    }
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// Adds a single `_is_outlier` boolean column, the OR across all processed
/// columns
///
/// The flag column is added even when no valid numeric column exists (all
/// false), matching the introspection expectations of downstream steps.
pub struct DetectOutliers;

impl Operation for DetectOutliers {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let detection = Detection::from_params(table, params)?;
        let mask = detection.mask(table);

        let flags = Column::new(
            OUTLIER_FLAG_COLUMN,
            mask.into_iter().map(Value::Bool).collect(),
        );
        Ok(OpOutput::Table(table.clone().with_column(flags)?))
    }
}

/// Re-runs detection internally, then replaces flagged cells per column with
/// a statistic computed from that column's non-flagged values only
///
/// Outliers never contribute to their own replacement value. `mode` falls
/// back to the mean when no mode exists.
pub struct ReplaceOutliers;

impl Operation for ReplaceOutliers {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let replace_with = params.str_or("replace_with", "mean")?;
        if !matches!(replace_with, "mean" | "median" | "mode") {
            return Err(Error::InvalidParameter(format!(
                "invalid 'replace_with' value '{}': must be 'mean', 'median', or 'mode'",
                replace_with
            )));
        }

        let detection = Detection::from_params(table, params)?;
        let mask = detection.mask(table);
        let mut result = table.clone();

        for name in &detection.columns {
            let Some(column) = table.column(name) else { continue };

            let clean_values: Vec<&Value> = column
                .values()
                .iter()
                .enumerate()
                .filter(|(row, value)| !mask[*row] && !value.is_null())
                .map(|(_, value)| value)
                .collect();
            let clean_numeric: Vec<f64> =
                clean_values.iter().filter_map(|v| v.as_f64()).collect();

            let replacement = match replace_with {
                "mean" => stats::mean(&clean_numeric).map(Value::Float),
                "median" => stats::median(&clean_numeric).map(Value::Float),
                _ => stats::mode(clean_values.iter().copied())
                    .or_else(|| stats::mean(&clean_numeric).map(Value::Float)),
            };
            let Some(replacement) = replacement else {
                warn!(
                    column = %name,
                    "no non-outlier values to compute replacement, skipping column"
                );
                continue;
            };

            if let Some(target) = result.column_mut(name) {
                for (row, flagged) in mask.iter().enumerate() {
                    if *flagged {
                        target.set(row, replacement.clone());
                    }
                }
            }
        }

        Ok(OpOutput::Table(result))
    }
}
