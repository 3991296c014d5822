//! Format standardization: coercing columns to numbers or ISO dates

use chrono::NaiveDate;
use dataprep_core::{OpOutput, OpSpec, Operation, Params, Result, Table, Value};
use tracing::warn;

/// Registry descriptor for [`StandardizeFormat`]
pub const SPEC: OpSpec = OpSpec {
    key: "standardize_format",
    description: "Coerces columns to numeric or ISO date formats",
    parameters: &[
        ("number_columns", "Columns to coerce to numbers"),
        ("date_columns", "Columns to normalize to YYYY-MM-DD dates"),
    ],
};

/// Date layouts accepted before normalization
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Coerces the named columns, turning unparseable cells into nulls
///
/// Mirrors lenient coercion: a cell that cannot be parsed becomes null
/// instead of failing the operation. Unknown column names are warned about
/// and skipped.
pub struct StandardizeFormat;

impl Operation for StandardizeFormat {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let number_columns = params.str_list("number_columns")?.unwrap_or_default();
        let date_columns = params.str_list("date_columns")?.unwrap_or_default();

        let mut result = table.clone();

        for name in &number_columns {
            match result.column_mut(name) {
                Some(column) => {
                    for cell in column.values_mut() {
                        *cell = coerce_number(cell);
                    }
                }
                None => warn!(column = %name, "number column not found, skipping"),
            }
        }

        for name in &date_columns {
            match result.column_mut(name) {
                Some(column) => {
                    for cell in column.values_mut() {
                        *cell = coerce_date(cell);
                    }
                }
                None => warn!(column = %name, "date column not found, skipping"),
            }
        }

        Ok(OpOutput::Table(result))
    }
}

fn coerce_number(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Int(_) | Value::Float(_) => value.clone(),
        Value::Bool(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => match s.trim().parse::<f64>() {
            Ok(parsed) => Value::Float(parsed),
            Err(_) => Value::Null,
        },
    }
}

fn coerce_date(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return Value::Null;
    };
    let trimmed = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Value::Str(date.format("%Y-%m-%d").to_string());
        }
    }
    Value::Null
}
