//! Column transformation operations

mod log;
mod normalize;
mod square_root;

pub use log::Log;
pub use normalize::Normalize;
pub use square_root::SquareRoot;

use dataprep_core::{Column, Error, Params, Result, Table, Value};
use dataprep_core::Registration;

/// The built-in transformation registrations
pub fn registrations() -> Vec<Registration> {
    vec![
        Registration::new(normalize::SPEC, || Box::new(Normalize)),
        Registration::new(log::SPEC, || Box::new(Log)),
        Registration::new(square_root::SPEC, || Box::new(SquareRoot)),
    ]
}

/// Resolve the required target column of a single-column transformation,
/// insisting it exists and is numeric
fn numeric_target<'t>(table: &'t Table, params: &Params<'_>) -> Result<&'t Column> {
    let name = params.required_str("column")?;
    let column = table.column(name).ok_or_else(|| {
        Error::InvalidParameter(format!("column '{}' not found in table", name))
    })?;
    if !column.is_numeric() {
        return Err(Error::InvalidParameter(format!(
            "column '{}' is not numeric",
            name
        )));
    }
    Ok(column)
}

/// Apply a cell-wise numeric function to the target column, preserving nulls
fn map_numeric_column(
    table: &Table,
    column: &Column,
    f: impl Fn(f64) -> f64,
) -> Result<Table> {
    let values: Vec<Value> = column
        .values()
        .iter()
        .map(|value| match value.as_f64() {
            Some(v) => Value::Float(f(v)),
            None => Value::Null,
        })
        .collect();

    table
        .clone()
        .with_column(Column::new(column.name(), values))
}

/// How a transformation treats negative inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NegativePolicy {
    /// Fail with a computation error when a negative (or non-positive, for
    /// log) value is present
    Error,
    /// Take the absolute value first
    Abs,
    /// Clamp below zero to zero first
    Zero,
}

impl NegativePolicy {
    fn from_params(params: &Params<'_>) -> Result<Self> {
        match params.str_or("handle_negatives", "error")? {
            "error" => Ok(Self::Error),
            "abs" => Ok(Self::Abs),
            "zero" => Ok(Self::Zero),
            other => Err(Error::InvalidParameter(format!(
                "invalid 'handle_negatives' value '{}': must be 'error', 'abs', or 'zero'",
                other
            ))),
        }
    }

    fn adjust(self, v: f64) -> f64 {
        match self {
            Self::Error => v,
            Self::Abs => v.abs(),
            Self::Zero => v.max(0.0),
        }
    }
}
