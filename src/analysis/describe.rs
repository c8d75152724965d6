use std::collections::HashMap;

use crate::data::model::{Dataset, Value};

/// Standard statistics for one numeric column. Undefined values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in `LABELS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// One row of the class distribution table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCount {
    pub class: String,
    pub count: usize,
    /// Share of labelled rows, rounded to 2 decimals.
    pub percent: f64,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Summaries for every numeric column, in table order.
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    dataset
        .numeric_columns()
        .map(|c| {
            let values = sorted(&c.present_numeric());
            ColumnSummary {
                name: c.name.clone(),
                count: values.len(),
                mean: mean(&values),
                std: sample_std(&values),
                min: values.first().copied().unwrap_or(f64::NAN),
                q25: quantile_sorted(&values, 0.25),
                median: quantile_sorted(&values, 0.5),
                q75: quantile_sorted(&values, 0.75),
                max: values.last().copied().unwrap_or(f64::NAN),
            }
        })
        .collect()
}

/// Count each distinct non-missing value of `column`, most frequent first,
/// ties in order of first appearance. `None` when the column is absent.
pub fn class_distribution(dataset: &Dataset, column: &str) -> Option<Vec<ClassCount>> {
    let col = dataset.column(column)?;

    let mut index: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for v in col.values.iter().filter(|v| !v.is_null()) {
        match index.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let labelled: usize = counts.iter().map(|(_, n)| n).sum();
    Some(
        counts
            .into_iter()
            .map(|(v, count)| ClassCount {
                class: v.to_string(),
                count,
                percent: (count as f64 / labelled as f64 * 10_000.0).round() / 100.0,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::analysis::{CLASS_SCALE, QUALITY_COLUMN};
    use crate::data::model::{Column, DType};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn describes_numeric_columns_only() {
        let ds = Dataset::from_columns(vec![
            Column::from_raw("x", &[Some("1"), Some("2"), Some("3"), Some("4"), None]),
            Column::from_raw("label", &[Some("a"), Some("b"), Some("c"), Some("d"), Some("e")]),
        ])
        .unwrap();

        let summary = describe(&ds);
        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, 1.2909944487358056));
        assert_eq!(s.min, 1.0);
        assert!(close(s.q25, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q75, 3.25));
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let ds = Dataset::from_columns(vec![Column::from_raw("x", &[Some("7")])]).unwrap();
        let s = &describe(&ds)[0];
        assert!(s.std.is_nan());
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn uniform_classes_are_a_quarter_each() {
        let labels: Vec<Option<&str>> = (0..100).map(|i| Some(CLASS_SCALE[i % 4].0)).collect();
        let ds = Dataset::from_columns(vec![Column::from_raw(QUALITY_COLUMN, &labels)]).unwrap();

        let dist = class_distribution(&ds, QUALITY_COLUMN).unwrap();
        assert_eq!(dist.len(), 4);
        for row in &dist {
            assert_eq!(row.count, 25);
            assert_eq!(row.percent, 25.0);
        }
        assert_eq!(dist[0].class, "bon");
    }

    #[test]
    fn distribution_sorts_by_count_and_skips_missing() {
        let ds = Dataset::from_columns(vec![Column::from_raw(
            QUALITY_COLUMN,
            &[Some("moyen"), Some("bon"), Some("bon"), None, Some("mauvais")],
        )])
        .unwrap();
        let dist = class_distribution(&ds, QUALITY_COLUMN).unwrap();
        let classes: Vec<&str> = dist.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(classes, ["bon", "moyen", "mauvais"]);
        assert_eq!(dist[0].percent, 50.0);
        assert!(class_distribution(&ds, "absent").is_none());
    }

    proptest! {
        #[test]
        fn class_percentages_sum_to_100(picks in prop::collection::vec(0usize..5, 1..200)) {
            let labels: Vec<Option<&str>> = picks
                .iter()
                .map(|&i| CLASS_SCALE.get(i).map(|(name, _)| *name))
                .collect();
            let ds = Dataset::from_columns(vec![Column::new(
                QUALITY_COLUMN,
                DType::Text,
                labels.iter().map(|l| l.map_or(Value::Null, |s| Value::Text(s.into()))).collect(),
            )])
            .unwrap();

            let dist = class_distribution(&ds, QUALITY_COLUMN).unwrap();
            if !dist.is_empty() {
                let total: f64 = dist.iter().map(|c| c.percent).sum();
                prop_assert!((total - 100.0).abs() <= 0.05, "total {}", total);
            }
        }
    }
}
