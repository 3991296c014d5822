//! Duplicate-row removal

use std::collections::{HashMap, HashSet};

use dataprep_core::value::ValueKey;
use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table};
use tracing::warn;

/// Registry descriptor for [`RemoveDuplicates`]
pub const SPEC: OpSpec = OpSpec {
    key: "remove_duplicates",
    description: "Removes duplicate rows",
    parameters: &[
        ("columns", "Column subset to compare (default: all columns)"),
        ("keep", "Which duplicate to keep: first, last, or none (default: first)"),
    ],
};

/// Deduplicates rows by a column subset, or the whole row when no subset is
/// given
///
/// A subset naming only nonexistent columns falls back to whole-row
/// comparison with a warning rather than failing.
pub struct RemoveDuplicates;

impl Operation for RemoveDuplicates {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let keep = params.str_or("keep", "first")?;
        if !matches!(keep, "first" | "last" | "none") {
            return Err(Error::InvalidParameter(format!(
                "invalid 'keep' value '{}': must be 'first', 'last', or 'none'",
                keep
            )));
        }

        let requested = params.str_list("columns")?;
        let subset: Vec<String> = match &requested {
            Some(columns) => {
                let valid: Vec<String> = columns
                    .iter()
                    .filter(|name| table.has_column(name))
                    .cloned()
                    .collect();
                if valid.is_empty() {
                    warn!(
                        ?columns,
                        "no valid columns in duplicate subset, comparing whole rows"
                    );
                    table.column_names().iter().map(|s| s.to_string()).collect()
                } else {
                    valid
                }
            }
            None => table.column_names().iter().map(|s| s.to_string()).collect(),
        };

        let keys: Vec<Vec<ValueKey>> = (0..table.row_count())
            .map(|row| {
                subset
                    .iter()
                    .filter_map(|name| table.column(name))
                    .filter_map(|column| column.get(row))
                    .map(|value| value.key())
                    .collect()
            })
            .collect();

        let mask = match keep {
            "first" => keep_first(&keys),
            "last" => keep_last(&keys),
            _ => keep_unique(&keys),
        };

        Ok(OpOutput::Table(table.retain_rows(&mask)))
    }
}

fn keep_first(keys: &[Vec<ValueKey>]) -> Vec<bool> {
    let mut seen = HashSet::new();
    keys.iter().map(|key| seen.insert(key.clone())).collect()
}

fn keep_last(keys: &[Vec<ValueKey>]) -> Vec<bool> {
    let mut seen = HashSet::new();
    let mut mask: Vec<bool> = keys
        .iter()
        .rev()
        .map(|key| seen.insert(key.clone()))
        .collect();
    mask.reverse();
    mask
}

fn keep_unique(keys: &[Vec<ValueKey>]) -> Vec<bool> {
    let mut counts: HashMap<&Vec<ValueKey>, usize> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    keys.iter()
        .map(|key| counts.get(key).copied() == Some(1))
        .collect()
}
