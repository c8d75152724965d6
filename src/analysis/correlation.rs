use crate::data::model::{Column, DType, Dataset, Value};

/// Square, symmetric matrix of Pearson coefficients between the numeric
/// columns of a dataset. Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Correlations of `name` with every other column, strongest positive
    /// first, NaN last.
    pub fn against(&self, name: &str) -> Vec<(String, f64)> {
        let Some(idx) = self.index_of(name) else {
            return Vec::new();
        };
        let mut out: Vec<(String, f64)> = self
            .names
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(i, n)| (n.clone(), self.values[idx][i]))
            .collect();
        out.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (false, false) => b.1.total_cmp(&a.1),
            (nan_a, nan_b) => nan_a.cmp(&nan_b),
        });
        out
    }
}

/// Pearson correlation over the rows where both sides are present.
/// NaN with fewer than two complete pairs or when either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Column cells as correlation input. Booleans count as 0/1; text columns
/// are skipped.
fn correlation_input(column: &Column) -> Option<Vec<Option<f64>>> {
    match column.dtype {
        DType::Integer | DType::Float => Some(column.numeric()),
        DType::Boolean => Some(
            column
                .values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    _ => None,
                })
                .collect(),
        ),
        DType::Text => None,
    }
}

/// Pairwise-complete Pearson matrix over every numeric or boolean column.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let columns: Vec<(String, Vec<Option<f64>>)> = dataset
        .columns
        .iter()
        .filter_map(|c| Some((c.name.clone(), correlation_input(c)?)))
        .collect();
    let k = columns.len();

    let mut values = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&columns[i].1, &columns[j].1);
            // Self-correlation is exactly one whenever it is defined.
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        names: columns.into_iter().map(|(n, _)| n).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn float_column(name: &str, cells: &[Option<f64>]) -> Column {
        Column::new(
            name,
            DType::Float,
            cells.iter().map(|c| c.map_or(Value::Null, Value::Float)).collect(),
        )
    }

    #[test]
    fn perfect_and_inverse_correlation() {
        let x = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(4.0), Some(6.0), Some(8.0)];
        let z = [Some(4.0), Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn ignores_incomplete_pairs() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(1.0), Some(100.0), Some(3.0), Some(4.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn undefined_cases_are_nan() {
        assert!(pearson(&[Some(1.0)], &[Some(2.0)]).is_nan());
        assert!(pearson(&[Some(1.0), Some(1.0)], &[Some(2.0), Some(3.0)]).is_nan());
    }

    #[test]
    fn matrix_skips_text_and_sorts_target_column() {
        let ds = Dataset::from_columns(vec![
            float_column("a", &[Some(1.0), Some(2.0), Some(3.0)]),
            Column::from_raw("label", &[Some("x"), Some("y"), Some("z")]),
            float_column("b", &[Some(3.0), Some(2.0), Some(1.0)]),
            float_column("flat", &[Some(5.0), Some(5.0), Some(5.0)]),
            float_column("target", &[Some(1.0), Some(2.0), Some(3.5)]),
        ])
        .unwrap();

        let m = correlation_matrix(&ds);
        assert_eq!(m.names, ["a", "b", "flat", "target"]);
        assert!(m.get(2, 2).is_nan());

        let against = m.against("target");
        let order: Vec<&str> = against.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, ["a", "b", "flat"]);
        assert!(against[2].1.is_nan());
        assert!(m.against("missing").is_empty());
    }

    #[test]
    fn boolean_columns_correlate_as_zero_one() {
        let ds = Dataset::from_columns(vec![
            float_column("a", &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::from_raw("industrial", &[Some("false"), Some("false"), Some("true"), Some("true")]),
        ])
        .unwrap();
        assert_eq!(ds.columns[1].dtype, DType::Boolean);

        let m = correlation_matrix(&ds);
        assert_eq!(m.names, ["a", "industrial"]);
        assert!(m.get(0, 1) > 0.8);
        assert_eq!(m.get(1, 1), 1.0);
    }

    proptest! {
        #[test]
        fn matrix_is_symmetric_with_unit_diagonal(
            rows in prop::collection::vec(
                prop::collection::vec(prop::option::of(-1e3f64..1e3), 3),
                2..40,
            )
        ) {
            let cols = (0..3)
                .map(|j| {
                    let cells: Vec<Option<f64>> = rows.iter().map(|r| r[j]).collect();
                    float_column(&format!("c{j}"), &cells)
                })
                .collect();
            let ds = Dataset::from_columns(cols).unwrap();
            let m = correlation_matrix(&ds);

            for i in 0..m.len() {
                for j in 0..m.len() {
                    let (a, b) = (m.get(i, j), m.get(j, i));
                    prop_assert!(a == b || (a.is_nan() && b.is_nan()));
                    if !a.is_nan() {
                        prop_assert!((-1.0..=1.0).contains(&a));
                    }
                }
                let present: Vec<f64> = ds.columns[i].present_numeric();
                let varies = present.iter().any(|v| *v != present[0]);
                if present.len() >= 2 && varies {
                    prop_assert_eq!(m.get(i, i), 1.0);
                }
            }
        }
    }
}
