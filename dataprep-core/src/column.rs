//! Named columns of equal-length value sequences

use serde::{Deserialize, Serialize};

use crate::value::{DataType, Value};

/// A named column of cell values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Name of the column
    name: String,

    /// Cell values, one per row
    values: Vec<Value>,
}

impl Column {
    /// Create a new column with the given name and values
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Get the name of this column
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the length of this column (number of rows)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the cell values of this column
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get mutable access to the cell values
    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Get a cell by row index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Overwrite a cell by row index; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: Value) {
        if let Some(cell) = self.values.get_mut(index) {
            *cell = value;
        }
    }

    /// Count of null cells in this column
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Infer the data type of this column
    ///
    /// Nulls are ignored; integer/float mixtures unify to [`DataType::Float`],
    /// any other mixture is [`DataType::Mixed`]. An all-null column is
    /// [`DataType::Null`].
    pub fn data_type(&self) -> DataType {
        let mut inferred: Option<DataType> = None;

        for value in &self.values {
            let dt = value.data_type();
            if dt == DataType::Null {
                continue;
            }

            inferred = Some(match inferred {
                None => dt,
                Some(current) if current == dt => current,
                Some(DataType::Int) if dt == DataType::Float => DataType::Float,
                Some(DataType::Float) if dt == DataType::Int => DataType::Float,
                Some(_) => return DataType::Mixed,
            });
        }

        inferred.unwrap_or(DataType::Null)
    }

    /// Whether this column holds numeric values
    pub fn is_numeric(&self) -> bool {
        self.data_type().is_numeric()
    }

    /// Iterate the non-null numeric values of this column
    pub fn numeric_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(Value::as_f64)
    }

    /// Iterate the non-null values of this column
    pub fn non_null_values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }
}
