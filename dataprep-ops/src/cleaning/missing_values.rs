//! Missing-value imputation and removal

use dataprep_core::{Column, Error, OpOutput, OpSpec, Operation, Params, Result, Table, Value};
use tracing::warn;

use crate::stats;

/// Registry descriptor for [`MissingValues`]
pub const SPEC: OpSpec = OpSpec {
    key: "missing_values",
    description: "Fills or removes missing values",
    parameters: &[
        ("method", "One of: mean, median, mode, constant, remove"),
        ("columns", "Columns to target (default: all columns)"),
        ("value", "Fill value, required for the constant method"),
        ("how", "Row-drop policy for remove: any or all (default: any)"),
    ],
};

/// Fills missing cells with a statistic or constant, or drops rows containing
/// them
///
/// `mean`/`median` apply to numeric columns only; non-numeric targets are
/// skipped with a warning. Targeting no valid columns is a no-op, not an
/// error.
pub struct MissingValues;

impl Operation for MissingValues {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let method = params.required_str("method")?;
        let requested = params.str_list("columns")?;

        let targets: Vec<String> = match &requested {
            Some(columns) => columns
                .iter()
                .filter(|name| table.has_column(name))
                .cloned()
                .collect(),
            None => table.column_names().iter().map(|s| s.to_string()).collect(),
        };

        if targets.is_empty() {
            warn!(?requested, "no valid columns for missing-value handling, returning table unchanged");
            return Ok(OpOutput::Table(table.clone()));
        }

        let result = match method {
            "mean" | "median" => fill_with_statistic(table, &targets, method),
            "mode" => fill_with_mode(table, &targets),
            "constant" => {
                let value = params.scalar("value")?.ok_or_else(|| {
                    Error::InvalidParameter(
                        "'constant' replacement requires a 'value' parameter".into(),
                    )
                })?;
                fill_with_constant(table, &targets, &value)
            }
            "remove" => {
                let how = params.str_or("how", "any")?;
                if how != "any" && how != "all" {
                    return Err(Error::InvalidParameter(format!(
                        "invalid 'how' value '{}': must be 'any' or 'all'",
                        how
                    )));
                }
                remove_rows(table, &targets, how)
            }
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown method '{}' for missing_values",
                    other
                )))
            }
        };

        Ok(OpOutput::Table(result))
    }
}

fn fill_with_statistic(table: &Table, targets: &[String], method: &str) -> Table {
    let mut result = table.clone();
    for name in targets {
        let Some(column) = table.column(name) else { continue };
        if !column.is_numeric() {
            warn!(column = %name, method, "column is not numeric, skipping imputation");
            continue;
        }

        let values: Vec<f64> = column.numeric_values().collect();
        let statistic = match method {
            "mean" => stats::mean(&values),
            _ => stats::median(&values),
        };
        let Some(fill) = statistic else {
            warn!(column = %name, method, "cannot compute statistic for column, skipping");
            continue;
        };

        fill_nulls(&mut result, name, &Value::Float(fill));
    }
    result
}

fn fill_with_mode(table: &Table, targets: &[String]) -> Table {
    let mut result = table.clone();
    for name in targets {
        let Some(column) = table.column(name) else { continue };
        // No mode means no non-null values; leave the column as-is.
        if let Some(fill) = stats::mode(column.values().iter()) {
            fill_nulls(&mut result, name, &fill);
        }
    }
    result
}

fn fill_with_constant(table: &Table, targets: &[String], value: &Value) -> Table {
    let mut result = table.clone();
    for name in targets {
        fill_nulls(&mut result, name, value);
    }
    result
}

fn fill_nulls(table: &mut Table, name: &str, fill: &Value) {
    if let Some(column) = table.column_mut(name) {
        for cell in column.values_mut() {
            if cell.is_null() {
                *cell = fill.clone();
            }
        }
    }
}

fn remove_rows(table: &Table, targets: &[String], how: &str) -> Table {
    let columns: Vec<&Column> = targets.iter().filter_map(|name| table.column(name)).collect();

    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| {
            let null_count = columns
                .iter()
                .filter(|c| c.get(row).map_or(false, Value::is_null))
                .count();
            match how {
                "any" => null_count == 0,
                _ => null_count < columns.len(),
            }
        })
        .collect();

    table.retain_rows(&keep)
}
