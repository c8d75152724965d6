use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::Dataset;

/// Suggested file name for the downloadable report.
pub const REPORT_FILE_NAME: &str = "rapport_valeurs_manquantes.csv";
pub const REPORT_MIME: &str = "text/csv";

const HEADER: [&str; 3] = ["", "Valeurs_manquantes", "Pourcentage_manquant (%)"];

#[derive(Debug, Clone, PartialEq)]
pub struct MissingRow {
    pub column: String,
    pub missing: usize,
    pub percent: f64,
}

/// Missing-value counts per column, most-missing first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MissingReport {
    pub rows: Vec<MissingRow>,
}

#[derive(Serialize)]
struct ReportRecord<'a> {
    column: &'a str,
    missing: usize,
    percent: f64,
}

impl MissingReport {
    /// Encode the report as UTF-8 CSV with a header row. The first,
    /// unnamed column holds the column names.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        wtr.write_record(HEADER).context("writing report header")?;
        for row in &self.rows {
            wtr.serialize(ReportRecord {
                column: &row.column,
                missing: row.missing,
                percent: row.percent,
            })
            .with_context(|| format!("writing report row for '{}'", row.column))?;
        }

        wtr.into_inner()
            .map_err(|e| anyhow::anyhow!("flushing report: {}", e.error()))
    }

    pub fn max_missing(&self) -> usize {
        self.rows.iter().map(|r| r.missing).max().unwrap_or(0)
    }
}

/// Count missing cells per column. Sorted by descending count; the sort is
/// stable so ties keep table order.
pub fn missing_report(dataset: &Dataset) -> MissingReport {
    let n_rows = dataset.len();
    let mut rows: Vec<MissingRow> = dataset
        .columns
        .iter()
        .map(|c| {
            let missing = c.null_count();
            let percent = if dataset.is_empty() {
                0.0
            } else {
                missing as f64 / n_rows as f64 * 100.0
            };
            MissingRow {
                column: c.name.clone(),
                missing,
                percent,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.missing.cmp(&a.missing));
    MissingReport { rows }
}

/// Row-major missingness flags: `matrix[row][col]`.
pub fn missingness_matrix(dataset: &Dataset) -> Vec<Vec<bool>> {
    (0..dataset.len())
        .map(|row| {
            dataset
                .columns
                .iter()
                .map(|c| c.values[row].is_null())
                .collect()
        })
        .collect()
}
