//! Descriptive statistics report

use std::collections::HashMap;

use dataprep_core::{Column, Error, OpOutput, OpSpec, Operation, Params, Result, Table, Value};
use serde_json::json;

use crate::stats;

/// Registry descriptor for [`Descriptive`]
pub const SPEC: OpSpec = OpSpec {
    key: "descriptive",
    description: "Summarizes numeric and categorical columns",
    parameters: &[(
        "columns",
        "Columns to summarize (default: all columns)",
    )],
};

/// Produces per-column summary statistics as a report
///
/// Numeric columns get count/mean/std/min/quartiles/max; everything else is
/// treated as categorical with unique counts and the most common values.
pub struct Descriptive;

impl Operation for Descriptive {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let targets: Vec<&Column> = match params.str_list("columns")? {
            Some(names) => names
                .iter()
                .map(|name| {
                    table.column(name).ok_or_else(|| {
                        Error::InvalidParameter(format!(
                            "column '{}' not found in table",
                            name
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            None => table.columns().iter().collect(),
        };

        let mut numeric = serde_json::Map::new();
        let mut categorical = serde_json::Map::new();
        for column in targets {
            if column.is_numeric() {
                numeric.insert(column.name().to_string(), numeric_summary(column));
            } else {
                categorical.insert(column.name().to_string(), categorical_summary(column));
            }
        }

        Ok(OpOutput::Report(json!({
            "row_count": table.row_count(),
            "column_count": table.column_count(),
            "numeric": numeric,
            "categorical": categorical,
        })))
    }
}

fn numeric_summary(column: &Column) -> serde_json::Value {
    let values: Vec<f64> = column.numeric_values().collect();
    let (min, max) = stats::min_max(&values).unzip();
    json!({
        "count": values.len(),
        "mean": stats::mean(&values),
        "std": stats::std_dev(&values),
        "min": min,
        "q25": stats::quantile(&values, 0.25),
        "median": stats::median(&values),
        "q75": stats::quantile(&values, 0.75),
        "max": max,
        "missing": column.null_count(),
    })
}

fn categorical_summary(column: &Column) -> serde_json::Value {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for value in column.values() {
        if value.is_null() {
            continue;
        }
        let text = match value {
            Value::Str(s) => s.clone(),
            other => other.to_json().to_string(),
        };
        if !counts.contains_key(&text) {
            order.push(text.clone());
        }
        *counts.entry(text).or_insert(0) += 1;
    }

    // Descending by count, first occurrence breaking ties.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    let most_common: Vec<serde_json::Value> = order
        .iter()
        .take(5)
        .map(|text| json!({"value": text, "count": counts[text]}))
        .collect();

    json!({
        "unique": counts.len(),
        "most_common": most_common,
        "missing": column.null_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn report(table: &Table, params_json: serde_json::Value) -> Result<serde_json::Value> {
        let map: Map<String, serde_json::Value> = serde_json::from_value(params_json).unwrap();
        Ok(Descriptive
            .apply(table, &Params::new(&map))?
            .into_report()
            .unwrap())
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new(
                "n",
                vec![1i64.into(), 2i64.into(), 3i64.into(), 4i64.into(), Value::Null],
            ),
            Column::new(
                "c",
                vec!["a".into(), "b".into(), "b".into(), Value::Null, "c".into()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_summary() {
        let report = report(&sample(), serde_json::json!({})).unwrap();
        let n = &report["numeric"]["n"];
        assert_eq!(n["count"], 4);
        assert_eq!(n["mean"], 2.5);
        assert_eq!(n["min"], 1.0);
        assert_eq!(n["max"], 4.0);
        assert_eq!(n["median"], 2.5);
        assert_eq!(n["missing"], 1);
    }

    #[test]
    fn test_categorical_summary() {
        let report = report(&sample(), serde_json::json!({})).unwrap();
        let c = &report["categorical"]["c"];
        assert_eq!(c["unique"], 3);
        assert_eq!(c["missing"], 1);
        assert_eq!(c["most_common"][0]["value"], "b");
        assert_eq!(c["most_common"][0]["count"], 2);
    }

    #[test]
    fn test_table_totals() {
        let report = report(&sample(), serde_json::json!({})).unwrap();
        assert_eq!(report["row_count"], 5);
        assert_eq!(report["column_count"], 2);
    }

    #[test]
    fn test_column_selection() {
        let report = report(&sample(), serde_json::json!({"columns": ["n"]})).unwrap();
        assert!(report["numeric"]["n"].is_object());
        assert!(report["categorical"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_column_rejected() {
        let err = report(&sample(), serde_json::json!({"columns": ["zzz"]})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }
}
