use std::f64::consts::PI;

use super::describe::{quantile_sorted, sample_std, sorted};

pub const HISTOGRAM_BINS: usize = 20;
pub const KDE_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// `(bin centre, count)` pairs, ready to draw as bars.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(e, &n)| ((e[0] + e[1]) / 2.0, n))
    }
}

/// Bin `values` over `[min, max]`; the last bin is closed. A constant
/// column is binned over `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated on
/// `points` evenly spaced x values spanning half a data range beyond each
/// end. `None` for fewer than two values or zero variance.
pub fn kde(values: &[f64], points: usize) -> Option<Vec<[f64; 2]>> {
    let n = values.len();
    let std = sample_std(values);
    if n < 2 || std.is_nan() || std <= 0.0 || points < 2 {
        return None;
    }
    let bandwidth = std * (n as f64).powf(-0.2);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = (max - min) / 2.0;
    let (start, end) = (min - pad, max + pad);
    let step = (end - start) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * PI).sqrt());

    Some(
        (0..points)
            .map(|i| {
                let x = start + step * i as f64;
                let density: f64 = values
                    .iter()
                    .map(|&xi| (-0.5 * ((x - xi) / bandwidth).powi(2)).exp())
                    .sum();
                [x, density * norm]
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quartiles, whiskers at the most extreme values within 1.5 × IQR of the
/// box, and everything beyond them as outliers.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let q1 = quantile_sorted(&v, 0.25);
    let median = quantile_sorted(&v, 0.5);
    let q3 = quantile_sorted(&v, 0.75);
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let inside = || v.iter().copied().filter(|x| (low_fence..=high_fence).contains(x));
    let lower_whisker = inside().next().unwrap_or(q1);
    let upper_whisker = inside().last().unwrap_or(q3);
    let outliers = v
        .iter()
        .copied()
        .filter(|x| !(low_fence..=high_fence).contains(x))
        .collect();

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_closes_last_bin() {
        let values: Vec<f64> = (0..=20).map(f64::from).collect();
        let h = histogram(&values, HISTOGRAM_BINS).unwrap();
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.edges.len(), 21);
        assert_eq!(h.counts.iter().sum::<usize>(), 21);
        assert_eq!(h.counts[19], 2);
        assert_eq!(h.bin_width(), 1.0);
    }

    #[test]
    fn constant_histogram_is_centred() {
        let h = histogram(&[3.0, 3.0], 20).unwrap();
        assert_eq!(h.edges[0], 2.5);
        assert!((h.edges[20] - 3.5).abs() < 1e-12);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
        let (centre, _) = h.bars().next().unwrap();
        assert!((centre - 2.525).abs() < 1e-12);
    }

    #[test]
    fn histogram_of_nothing() {
        assert!(histogram(&[], 20).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0, 7.5];
        let curve = kde(&values, 400).unwrap();
        let dx = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * dx).sum();
        assert!((area - 1.0).abs() < 0.1, "area {area}");
        assert!(curve.iter().all(|p| p[1] >= 0.0));
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde(&[1.0], KDE_POINTS).is_none());
        assert!(kde(&[2.0, 2.0, 2.0], KDE_POINTS).is_none());
    }

    #[test]
    fn box_stats_flag_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = box_stats(&values).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
    }
}
