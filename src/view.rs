use std::fmt;

use clap::ValueEnum;

use crate::analysis::coerce::{coerce_text_columns, map_classes};
use crate::analysis::correlation::{CorrelationMatrix, correlation_matrix};
use crate::analysis::describe::{ClassCount, ColumnSummary, class_distribution, describe};
use crate::analysis::distribution::{
    BoxStats, HISTOGRAM_BINS, Histogram, KDE_POINTS, box_stats, histogram, kde,
};
use crate::analysis::missing::{MissingReport, missing_report, missingness_matrix};
use crate::analysis::{CLASS_NUM_COLUMN, QUALITY_COLUMN};
use crate::data::model::{DType, Dataset, Value};

pub const PREVIEW_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Menu entries
// ---------------------------------------------------------------------------

/// The five mutually exclusive views offered by the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    Overview,
    MissingValues,
    DescriptiveStats,
    Visualizations,
    Correlations,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Overview,
        View::MissingValues,
        View::DescriptiveStats,
        View::Visualizations,
        View::Correlations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Overview => "Aperçu général",
            View::MissingValues => "Valeurs manquantes",
            View::DescriptiveStats => "Analyse descriptive",
            View::Visualizations => "Visualisations",
            View::Correlations => "Corrélations",
        }
    }
}

/// Plot kinds offered inside the Visualizations view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotKind {
    #[default]
    Histograms,
    Density,
    Boxplots,
    ScatterMatrix,
    Pairplot,
}

impl PlotKind {
    pub const ALL: [PlotKind; 5] = [
        PlotKind::Histograms,
        PlotKind::Density,
        PlotKind::Boxplots,
        PlotKind::ScatterMatrix,
        PlotKind::Pairplot,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlotKind::Histograms => "Histogrammes",
            PlotKind::Density => "Densité",
            PlotKind::Boxplots => "Boîtes à moustaches",
            PlotKind::ScatterMatrix => "Scatter Matrix",
            PlotKind::Pairplot => "Pairplot",
        }
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory shown when a view needs a column the dataset does not have.
/// The affected part of the view is skipped; nothing else changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumnWarning {
    pub column: String,
    pub message: String,
}

impl MissingColumnWarning {
    fn absent(column: &str) -> Self {
        MissingColumnWarning {
            column: column.to_string(),
            message: format!("La colonne '{column}' n'existe pas dans ce fichier."),
        }
    }

    fn pairplot(column: &str) -> Self {
        MissingColumnWarning {
            column: column.to_string(),
            message: format!("Impossible d'afficher le pairplot : colonne '{column}' absente."),
        }
    }
}

impl fmt::Display for MissingColumnWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// Payloads: everything a view needs to draw, computed up front
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewPayload {
    pub columns: Vec<String>,
    pub head: Vec<Vec<Value>>,
    pub dtypes: Vec<(String, DType)>,
    pub n_rows: usize,
    pub n_cols: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingPayload {
    pub report: MissingReport,
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<bool>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptivePayload {
    pub summary: Vec<ColumnSummary>,
    pub classes: Option<Vec<ClassCount>>,
    pub warning: Option<MissingColumnWarning>,
}

/// A named set of points; one per colour group.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixCell {
    Scatter(Vec<Series>),
    Density(Vec<Series>),
}

/// An n × n grid of plots over n numeric columns; `cells[row][col]`
/// plots column `col` on x against column `row` on y.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotMatrix {
    pub names: Vec<String>,
    pub groups: Vec<String>,
    pub cells: Vec<Vec<MatrixCell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Histograms(Vec<(String, Histogram)>),
    Density(Vec<(String, Vec<[f64; 2]>)>),
    Boxplots(Vec<(String, BoxStats)>),
    ScatterMatrix(PlotMatrix),
    Pairplot(PlotMatrix),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualPayload {
    pub kind: PlotKind,
    pub figure: Option<Figure>,
    pub warning: Option<MissingColumnWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPayload {
    pub matrix: Option<CorrelationMatrix>,
    /// `class_num` against every other column, sorted descending.
    pub against_class: Vec<(String, f64)>,
    pub coerced_columns: usize,
    pub warning: Option<MissingColumnWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewPayload {
    Overview(OverviewPayload),
    MissingValues(MissingPayload),
    DescriptiveStats(DescriptivePayload),
    Visualizations(VisualPayload),
    Correlations(CorrelationPayload),
}

impl ViewPayload {
    pub fn warning(&self) -> Option<&MissingColumnWarning> {
        match self {
            ViewPayload::DescriptiveStats(p) => p.warning.as_ref(),
            ViewPayload::Visualizations(p) => p.warning.as_ref(),
            ViewPayload::Correlations(p) => p.warning.as_ref(),
            ViewPayload::Overview(_) | ViewPayload::MissingValues(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Compute the payload for one view. `plot` only matters for
/// [`View::Visualizations`]. The dataset is never modified.
pub fn dispatch(dataset: &Dataset, view: View, plot: PlotKind) -> ViewPayload {
    log::debug!("Computing payload for {view:?} ({plot:?})");
    let payload = match view {
        View::Overview => ViewPayload::Overview(overview(dataset)),
        View::MissingValues => ViewPayload::MissingValues(missing_values(dataset)),
        View::DescriptiveStats => ViewPayload::DescriptiveStats(descriptive(dataset)),
        View::Visualizations => ViewPayload::Visualizations(visualizations(dataset, plot)),
        View::Correlations => ViewPayload::Correlations(correlations(dataset)),
    };
    if let Some(w) = payload.warning() {
        log::warn!("{w}");
    }
    payload
}

fn overview(dataset: &Dataset) -> OverviewPayload {
    OverviewPayload {
        columns: dataset.column_names(),
        head: dataset
            .head(PREVIEW_ROWS)
            .into_iter()
            .map(|row| row.into_iter().cloned().collect())
            .collect(),
        dtypes: dataset
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype))
            .collect(),
        n_rows: dataset.len(),
        n_cols: dataset.width(),
    }
}

fn missing_values(dataset: &Dataset) -> MissingPayload {
    MissingPayload {
        report: missing_report(dataset),
        columns: dataset.column_names(),
        matrix: missingness_matrix(dataset),
    }
}

fn descriptive(dataset: &Dataset) -> DescriptivePayload {
    let classes = class_distribution(dataset, QUALITY_COLUMN);
    let warning = classes
        .is_none()
        .then(|| MissingColumnWarning::absent(QUALITY_COLUMN));
    DescriptivePayload {
        summary: describe(dataset),
        classes,
        warning,
    }
}

fn visualizations(dataset: &Dataset, kind: PlotKind) -> VisualPayload {
    let numeric = || {
        dataset
            .numeric_columns()
            .map(|c| (c.name.clone(), c.present_numeric()))
    };

    let (figure, warning) = match kind {
        PlotKind::Histograms => (
            Some(Figure::Histograms(
                numeric()
                    .filter_map(|(n, v)| Some((n, histogram(&v, HISTOGRAM_BINS)?)))
                    .collect(),
            )),
            None,
        ),
        PlotKind::Density => (
            Some(Figure::Density(
                numeric()
                    .filter_map(|(n, v)| Some((n, kde(&v, KDE_POINTS)?)))
                    .collect(),
            )),
            None,
        ),
        PlotKind::Boxplots => (
            Some(Figure::Boxplots(
                numeric()
                    .filter_map(|(n, v)| Some((n, box_stats(&v)?)))
                    .collect(),
            )),
            None,
        ),
        PlotKind::ScatterMatrix => (
            Some(Figure::ScatterMatrix(plot_matrix(dataset, None))),
            None,
        ),
        PlotKind::Pairplot => match dataset.column(QUALITY_COLUMN) {
            Some(labels) => {
                let groups: Vec<Option<String>> = labels
                    .values
                    .iter()
                    .map(|v| (!v.is_null()).then(|| v.to_string()))
                    .collect();
                (
                    Some(Figure::Pairplot(plot_matrix(dataset, Some(&groups)))),
                    None,
                )
            }
            None => (None, Some(MissingColumnWarning::pairplot(QUALITY_COLUMN))),
        },
    };

    VisualPayload {
        kind,
        figure,
        warning,
    }
}

/// Build an all-pairs grid over the numeric columns. With `groups`, rows
/// are split by group label (rows without a label are left out) and the
/// grouping column itself is not plotted.
fn plot_matrix(dataset: &Dataset, groups: Option<&[Option<String>]>) -> PlotMatrix {
    let columns: Vec<(String, Vec<Option<f64>>)> = dataset
        .numeric_columns()
        .filter(|c| groups.is_none() || c.name != QUALITY_COLUMN)
        .map(|c| (c.name.clone(), c.numeric()))
        .collect();

    let mut group_names: Vec<String> = Vec::new();
    let row_group: Vec<Option<usize>> = match groups {
        None => vec![Some(0); dataset.len()],
        Some(labels) => labels
            .iter()
            .map(|l| {
                let l = l.as_ref()?;
                Some(match group_names.iter().position(|g| g == l) {
                    Some(i) => i,
                    None => {
                        group_names.push(l.clone());
                        group_names.len() - 1
                    }
                })
            })
            .collect(),
    };
    if groups.is_none() {
        group_names.push(String::new());
    }

    let in_group = |row: usize, group: usize| row_group.get(row).copied().flatten() == Some(group);
    let cells = (0..columns.len())
        .map(|row| {
            (0..columns.len())
                .map(|col| {
                    if row == col {
                        MatrixCell::Density(
                            group_names
                                .iter()
                                .enumerate()
                                .filter_map(|(g, label)| {
                                    let values: Vec<f64> = columns[col]
                                        .1
                                        .iter()
                                        .enumerate()
                                        .filter(|(i, _)| in_group(*i, g))
                                        .filter_map(|(_, v)| *v)
                                        .collect();
                                    Some(Series {
                                        label: label.clone(),
                                        points: kde(&values, KDE_POINTS)?,
                                    })
                                })
                                .collect(),
                        )
                    } else {
                        MatrixCell::Scatter(
                            group_names
                                .iter()
                                .enumerate()
                                .map(|(g, label)| Series {
                                    label: label.clone(),
                                    points: columns[col]
                                        .1
                                        .iter()
                                        .zip(&columns[row].1)
                                        .enumerate()
                                        .filter(|(i, _)| in_group(*i, g))
                                        .filter_map(|(_, (x, y))| Some([(*x)?, (*y)?]))
                                        .collect(),
                                })
                                .collect(),
                        )
                    }
                })
                .collect()
        })
        .collect();

    PlotMatrix {
        names: columns.into_iter().map(|(n, _)| n).collect(),
        groups: group_names,
        cells,
    }
}

/// Correlate on a working copy: derive `class_num` from the labels, coerce
/// the remaining text columns, then compute the Pearson matrix.
fn correlations(dataset: &Dataset) -> CorrelationPayload {
    let Some(class_num) = map_classes(dataset, QUALITY_COLUMN) else {
        return CorrelationPayload {
            matrix: None,
            against_class: Vec::new(),
            coerced_columns: 0,
            warning: Some(MissingColumnWarning::absent(QUALITY_COLUMN)),
        };
    };

    let mut working = dataset.clone();
    let coerced_columns = coerce_text_columns(&mut working, &[QUALITY_COLUMN]);
    working.set_column(class_num);

    let matrix = correlation_matrix(&working);
    let against_class = matrix.against(CLASS_NUM_COLUMN);
    CorrelationPayload {
        matrix: Some(matrix),
        against_class,
        coerced_columns,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CLASS_SCALE;
    use crate::data::model::Column;

    fn pollution(with_quality: bool) -> Dataset {
        let n = 100;
        let pm10: Vec<String> = (0..n).map(|i| format!("{}", 10 + (i % 4) * 10)).collect();
        let no2: Vec<String> = (0..n).map(|i| format!("{}.5", 40 - (i % 7))).collect();
        let co: Vec<String> = (0..n)
            .map(|i| if i % 10 == 0 { "n/a".into() } else { format!("{}µg", i % 3) })
            .collect();
        let quality: Vec<&str> = (0..n).map(|i| CLASS_SCALE[i % 4].0).collect();

        fn raw(v: &[String]) -> Vec<Option<&str>> {
            v.iter().map(|s| Some(s.as_str())).collect()
        }
        let mut cols = vec![
            Column::from_raw("PM10", &raw(&pm10)),
            Column::from_raw("NO2", &raw(&no2)),
            Column::from_raw("CO", &raw(&co)),
        ];
        if with_quality {
            let labels: Vec<Option<&str>> = quality.iter().map(|s| Some(*s)).collect();
            cols.push(Column::from_raw(QUALITY_COLUMN, &labels));
        }
        Dataset::from_columns(cols).unwrap()
    }

    #[test]
    fn overview_previews_ten_rows() {
        let ds = pollution(true);
        let ViewPayload::Overview(p) = dispatch(&ds, View::Overview, PlotKind::default()) else {
            panic!("wrong payload");
        };
        assert_eq!(p.head.len(), PREVIEW_ROWS);
        assert_eq!((p.n_rows, p.n_cols), (100, 4));
        assert_eq!(p.dtypes[0], ("PM10".to_string(), DType::Integer));
        assert_eq!(p.dtypes[2].1, DType::Text);
    }

    #[test]
    fn missing_view_reports_and_flags() {
        let ds = pollution(true);
        let ViewPayload::MissingValues(p) = dispatch(&ds, View::MissingValues, PlotKind::default())
        else {
            panic!("wrong payload");
        };
        assert_eq!(p.report.rows[0].column, "CO");
        assert_eq!(p.report.rows[0].missing, 10);
        assert_eq!(p.matrix.len(), 100);
        assert!(p.matrix[0][2]);
    }

    #[test]
    fn descriptive_without_quality_warns_and_skips_classes() {
        let ds = pollution(false);
        let ViewPayload::DescriptiveStats(p) =
            dispatch(&ds, View::DescriptiveStats, PlotKind::default())
        else {
            panic!("wrong payload");
        };
        assert_eq!(p.summary.len(), 2);
        assert!(p.classes.is_none());
        assert_eq!(p.warning.unwrap().column, QUALITY_COLUMN);
    }

    #[test]
    fn descriptive_with_uniform_quality() {
        let ds = pollution(true);
        let ViewPayload::DescriptiveStats(p) =
            dispatch(&ds, View::DescriptiveStats, PlotKind::default())
        else {
            panic!("wrong payload");
        };
        let classes = p.classes.unwrap();
        assert_eq!(classes.len(), 4);
        assert!(classes.iter().all(|c| c.count == 25 && c.percent == 25.0));
        assert!(p.warning.is_none());
    }

    #[test]
    fn histograms_cover_numeric_columns() {
        let ds = pollution(true);
        let ViewPayload::Visualizations(p) = dispatch(&ds, View::Visualizations, PlotKind::Histograms)
        else {
            panic!("wrong payload");
        };
        let Some(Figure::Histograms(h)) = p.figure else {
            panic!("no histograms");
        };
        assert_eq!(h.len(), 2);
        assert!(h.iter().all(|(_, hist)| hist.counts.len() == HISTOGRAM_BINS));
    }

    #[test]
    fn scatter_matrix_has_density_diagonal() {
        let ds = pollution(true);
        let ViewPayload::Visualizations(p) =
            dispatch(&ds, View::Visualizations, PlotKind::ScatterMatrix)
        else {
            panic!("wrong payload");
        };
        let Some(Figure::ScatterMatrix(m)) = p.figure else {
            panic!("no matrix");
        };
        assert_eq!(m.names, ["PM10", "NO2"]);
        assert!(matches!(m.cells[0][0], MatrixCell::Density(_)));
        let MatrixCell::Scatter(series) = &m.cells[0][1] else {
            panic!("expected scatter");
        };
        assert_eq!(series[0].points.len(), 100);
    }

    #[test]
    fn pairplot_groups_by_class_or_warns() {
        let ds = pollution(true);
        let ViewPayload::Visualizations(p) = dispatch(&ds, View::Visualizations, PlotKind::Pairplot)
        else {
            panic!("wrong payload");
        };
        let Some(Figure::Pairplot(m)) = p.figure else {
            panic!("no pairplot");
        };
        assert_eq!(m.groups, ["bon", "moyen", "mauvais", "dangereuse"]);
        let MatrixCell::Scatter(series) = &m.cells[1][0] else {
            panic!("expected scatter");
        };
        assert_eq!(series.len(), 4);
        assert_eq!(series.iter().map(|s| s.points.len()).sum::<usize>(), 100);

        let without = pollution(false);
        let ViewPayload::Visualizations(p) =
            dispatch(&without, View::Visualizations, PlotKind::Pairplot)
        else {
            panic!("wrong payload");
        };
        assert!(p.figure.is_none());
        assert!(p.warning.is_some());
    }

    #[test]
    fn correlations_include_class_num_and_leave_dataset_untouched() {
        let ds = pollution(true);
        let before = ds.clone();
        let ViewPayload::Correlations(p) = dispatch(&ds, View::Correlations, PlotKind::default())
        else {
            panic!("wrong payload");
        };
        let matrix = p.matrix.unwrap();
        assert_eq!(matrix.names, ["PM10", "NO2", "CO", CLASS_NUM_COLUMN]);
        assert_eq!(p.coerced_columns, 1);

        // PM10 and the class rank both cycle with i % 4.
        assert_eq!(p.against_class[0].0, "PM10");
        assert!((p.against_class[0].1 - 1.0).abs() < 1e-9);
        assert_eq!(p.against_class.len(), 3);
        assert_eq!(ds, before);
    }

    #[test]
    fn correlations_without_quality_warn() {
        let ds = pollution(false);
        let ViewPayload::Correlations(p) = dispatch(&ds, View::Correlations, PlotKind::default())
        else {
            panic!("wrong payload");
        };
        assert!(p.matrix.is_none());
        assert!(p.against_class.is_empty());
        assert!(p.warning.is_some());
    }
}
