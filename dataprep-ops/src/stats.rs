//! Small numeric helpers shared by the built-in operations
//!
//! All functions operate on the non-null numeric values a caller has already
//! extracted and return `None` when the statistic is undefined, so operations
//! can skip degenerate columns instead of failing.

use std::collections::HashMap;

use dataprep_core::value::{Value, ValueKey};

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` with fewer than two values
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Linearly interpolated quantile over the sorted values; `None` when empty
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let fraction = position - lower as f64;
    Some(sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction)
}

/// Median (0.5 quantile)
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Smallest and largest value; `None` when empty
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for v in iter {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}

/// First modal value: the most frequent non-null value, ties broken by the
/// smallest value; `None` when there are no non-null values
pub fn mode<'a, I>(values: I) -> Option<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut counts: HashMap<ValueKey, usize> = HashMap::new();
    let mut order: Vec<(ValueKey, Value)> = Vec::new();

    for value in values {
        if value.is_null() {
            continue;
        }
        let key = value.key();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            order.push((key, value.clone()));
        }
        *count += 1;
    }

    let mut best: Option<(usize, Value)> = None;
    for (key, value) in order {
        let count = counts.get(&key).copied().unwrap_or(0);
        let better = match &best {
            None => true,
            Some((best_count, best_value)) => {
                count > *best_count
                    || (count == *best_count && value_before(&value, best_value))
            }
        };
        if better {
            best = Some((count, value));
        }
    }
    best.map(|(_, value)| value)
}

/// Ordering used for modal ties: numeric before-ness when both values are
/// numeric, lexicographic for strings, first occurrence otherwise
fn value_before(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x < y,
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => x < y,
            _ => false,
        },
    }
}

/// Pearson correlation coefficient over paired values; `None` when fewer than
/// two pairs or either side has zero variance
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mx = mean(xs)?;
    let my = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx).powi(2);
        var_y += (y - my).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);

        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let s = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.1380899).abs() < 1e-6);

        assert_eq!(std_dev(&[1.0]), None);
    }

    #[test]
    fn test_quantile_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(median(&[1.0, 2.0, 4.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let values = vec![
            Value::Str("a".into()),
            Value::Str("b".into()),
            Value::Str("b".into()),
            Value::Null,
        ];
        assert_eq!(mode(&values), Some(Value::Str("b".into())));

        assert_eq!(mode(&[Value::Null]), None);
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        // [2, 1, 1, 2]: both values are modal, the smaller one wins.
        let tied = vec![Value::Int(2), Value::Int(1), Value::Int(1), Value::Int(2)];
        assert_eq!(mode(&tied), Some(Value::Int(1)));

        let strings = vec![
            Value::Str("b".into()),
            Value::Str("a".into()),
            Value::Str("a".into()),
            Value::Str("b".into()),
        ];
        assert_eq!(mode(&strings), Some(Value::Str("a".into())));
    }

    #[test]
    fn test_pearson() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);

        let inverse = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &inverse).unwrap() + 1.0).abs() < 1e-12);

        let constant = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(pearson(&xs, &constant), None);
    }
}
