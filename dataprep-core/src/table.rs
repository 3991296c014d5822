//! In-memory tabular dataset

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{Error, Result};
use crate::value::Value;

/// An ordered collection of named, equal-length columns
///
/// Tables behave as value types across the pipeline: every operation receives
/// a table and returns a new one, and the executor always takes the returned
/// table as the new current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from columns, enforcing unique names and equal lengths
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(Error::TableShape(format!(
                        "column '{}' has {} rows, expected {}",
                        column.name(),
                        column.len(),
                        expected
                    )));
                }
            }
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == column.name()) {
                return Err(Error::TableShape(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All columns, in table order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Mutable lookup of a column by name
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names, in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Names of the numeric columns, in table order
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Add a column, replacing any existing column of the same name
    ///
    /// The new column must match the table's row count (unless the table has
    /// no columns yet).
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(Error::TableShape(format!(
                "column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.row_count()
            )));
        }

        if let Some(existing) = self.column_mut(column.name()) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
        Ok(self)
    }

    /// One row of cells, in column order
    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns
            .iter()
            .filter_map(|c| c.get(index))
            .collect()
    }

    /// Keep only the rows where `mask` is true
    ///
    /// The mask must be one flag per row; extra flags are ignored and missing
    /// flags drop the row.
    pub fn retain_rows(&self, mask: &[bool]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let values = column
                    .values()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask.get(*i).copied().unwrap_or(false))
                    .map(|(_, v)| v.clone())
                    .collect();
                Column::new(column.name(), values)
            })
            .collect();

        Self { columns }
    }
}
