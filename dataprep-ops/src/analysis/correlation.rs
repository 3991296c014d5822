//! Pairwise correlation report

use dataprep_core::{Error, OpOutput, OpSpec, Operation, Params, Result, Table};
use serde_json::json;

use crate::stats;

/// Registry descriptor for [`Correlation`]
pub const SPEC: OpSpec = OpSpec {
    key: "correlation",
    description: "Computes pairwise Pearson correlations over numeric columns",
    parameters: &[
        ("method", "Correlation method, only 'pearson' is supported (default: pearson)"),
        ("min_correlation", "Absolute threshold for significant pairs (default: 0.1)"),
        ("columns", "Columns to correlate (default: all numeric columns)"),
    ],
};

/// Builds the full correlation matrix plus a filtered list of significant
/// pairs, strongest first
pub struct Correlation;

impl Operation for Correlation {
    fn apply(&self, table: &Table, params: &Params<'_>) -> Result<OpOutput> {
        let method = params.str_or("method", "pearson")?;
        if method != "pearson" {
            return Err(Error::InvalidParameter(format!(
                "invalid 'method' value '{}': only 'pearson' is supported",
                method
            )));
        }
        let min_correlation = params.f64_or("min_correlation", 0.1)?;

        let names: Vec<String> = match params.str_list("columns")? {
            Some(requested) => {
                for name in &requested {
                    let column = table.column(name).ok_or_else(|| {
                        Error::InvalidParameter(format!(
                            "column '{}' not found in table",
                            name
                        ))
                    })?;
                    if !column.is_numeric() {
                        return Err(Error::InvalidParameter(format!(
                            "column '{}' is not numeric",
                            name
                        )));
                    }
                }
                requested
            }
            None => table.numeric_column_names(),
        };
        if names.len() < 2 {
            return Err(Error::Computation(
                "correlation requires at least two numeric columns".to_string(),
            ));
        }

        // Pairwise complete observations: a row contributes to a pair only
        // when both cells are non-null.
        let mut matrix = serde_json::Map::new();
        let mut pairs: Vec<(String, String, f64)> = Vec::new();
        for (i, left) in names.iter().enumerate() {
            let mut row = serde_json::Map::new();
            for (j, right) in names.iter().enumerate() {
                let r = if i == j {
                    Some(1.0)
                } else {
                    pairwise_pearson(table, left, right)
                };
                row.insert(right.clone(), json!(r));
                if j > i {
                    if let Some(r) = r {
                        if r.abs() >= min_correlation {
                            pairs.push((left.clone(), right.clone(), r));
                        }
                    }
                }
            }
            matrix.insert(left.clone(), serde_json::Value::Object(row));
        }

        pairs.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let significant: Vec<serde_json::Value> = pairs
            .iter()
            .map(|(left, right, r)| {
                json!({
                    "column_a": left,
                    "column_b": right,
                    "correlation": r,
                    "strength": strength(*r),
                })
            })
            .collect();

        Ok(OpOutput::Report(json!({
            "method": "pearson",
            "columns": names,
            "matrix": matrix,
            "significant_pairs": significant,
        })))
    }
}

fn pairwise_pearson(table: &Table, left: &str, right: &str) -> Option<f64> {
    let a = table.column(left)?;
    let b = table.column(right)?;
    let (mut xs, mut ys) = (Vec::new(), Vec::new());
    for (va, vb) in a.values().iter().zip(b.values()) {
        if let (Some(x), Some(y)) = (va.as_f64(), vb.as_f64()) {
            xs.push(x);
            ys.push(y);
        }
    }
    stats::pearson(&xs, &ys)
}

fn strength(r: f64) -> &'static str {
    let magnitude = r.abs();
    if magnitude >= 0.7 {
        "strong"
    } else if magnitude >= 0.3 {
        "moderate"
    } else {
        "weak"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataprep_core::Column;
    use serde_json::Map;

    fn report(table: &Table, params_json: serde_json::Value) -> Result<serde_json::Value> {
        let map: Map<String, serde_json::Value> = serde_json::from_value(params_json).unwrap();
        Ok(Correlation
            .apply(table, &Params::new(&map))?
            .into_report()
            .unwrap())
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::new("x", vec![1i64.into(), 2i64.into(), 3i64.into(), 4i64.into()]),
            Column::new("y", vec![2i64.into(), 4i64.into(), 6i64.into(), 8i64.into()]),
            Column::new(
                "z",
                vec![4i64.into(), 3i64.into(), 2i64.into(), 1i64.into()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_perfect_correlations() {
        let report = report(&sample(), serde_json::json!({})).unwrap();
        assert_eq!(report["matrix"]["x"]["x"], 1.0);
        assert!((report["matrix"]["x"]["y"].as_f64().unwrap() - 1.0).abs() < 1e-12);
        assert!((report["matrix"]["x"]["z"].as_f64().unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_significant_pairs_sorted_and_labeled() {
        let report = report(&sample(), serde_json::json!({})).unwrap();
        let pairs = report["significant_pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 3);
        for pair in pairs {
            assert_eq!(pair["strength"], "strong");
            assert!(pair["correlation"].as_f64().unwrap().abs() >= 0.999);
        }
    }

    #[test]
    fn test_threshold_filters_pairs() {
        let report = report(&sample(), serde_json::json!({"min_correlation": 1.5})).unwrap();
        assert!(report["significant_pairs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_zero_variance_column_yields_null_entry() {
        let table = Table::from_columns(vec![
            Column::new("x", vec![1i64.into(), 2i64.into(), 3i64.into()]),
            Column::new("c", vec![5i64.into(), 5i64.into(), 5i64.into()]),
        ])
        .unwrap();

        let report = report(&table, serde_json::json!({})).unwrap();
        assert!(report["matrix"]["x"]["c"].is_null());
    }

    #[test]
    fn test_too_few_columns_is_computation_error() {
        let table =
            Table::from_columns(vec![Column::new("x", vec![1i64.into()])]).unwrap();
        let err = report(&table, serde_json::json!({})).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_non_pearson_method_rejected() {
        let err = report(&sample(), serde_json::json!({"method": "spearman"})).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_strength_boundaries() {
        assert_eq!(strength(0.29), "weak");
        assert_eq!(strength(0.3), "moderate");
        assert_eq!(strength(-0.69), "moderate");
        assert_eq!(strength(0.7), "strong");
    }
}
