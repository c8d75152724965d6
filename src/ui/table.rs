use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::analysis::describe::{ClassCount, ColumnSummary};
use crate::analysis::missing::MissingReport;
use crate::color::{Colormap, contrast_text};
use crate::data::model::{DType, Value};

const ROW_HEIGHT: f32 = 20.0;

/// Format a statistic the way the tables show it.
pub fn fmt_num(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

/// A plain striped table of text cells with a header row.
fn text_table(ui: &mut Ui, id: &str, headers: &[String], rows: &[Vec<String>]) {
    if headers.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(ROW_HEIGHT, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h.as_str());
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut tr| {
                        for cell in row {
                            tr.col(|ui: &mut Ui| {
                                ui.label(cell.as_str());
                            });
                        }
                    });
                }
            });
    });
}

/// First rows of the dataset, row index first.
pub fn preview_table(ui: &mut Ui, columns: &[String], head: &[Vec<Value>]) {
    let headers: Vec<String> = std::iter::once(String::new())
        .chain(columns.iter().cloned())
        .collect();
    let rows: Vec<Vec<String>> = head
        .iter()
        .enumerate()
        .map(|(i, row)| {
            std::iter::once(i.to_string())
                .chain(row.iter().map(|v| match v {
                    Value::Null => "None".to_string(),
                    other => other.to_string(),
                }))
                .collect()
        })
        .collect();
    text_table(ui, "preview", &headers, &rows);
}

pub fn dtype_table(ui: &mut Ui, dtypes: &[(String, DType)]) {
    let headers = vec!["Colonne".to_string(), "Type".to_string()];
    let rows: Vec<Vec<String>> = dtypes
        .iter()
        .map(|(name, dtype)| vec![name.clone(), dtype.to_string()])
        .collect();
    text_table(ui, "dtypes", &headers, &rows);
}

/// Statistics laid out with one row per statistic and one column per
/// dataset column.
pub fn describe_table(ui: &mut Ui, summary: &[ColumnSummary]) {
    let headers: Vec<String> = std::iter::once(String::new())
        .chain(summary.iter().map(|s| s.name.clone()))
        .collect();
    let rows: Vec<Vec<String>> = ColumnSummary::LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            std::iter::once(label.to_string())
                .chain(summary.iter().map(|s| fmt_num(s.values()[i])))
                .collect()
        })
        .collect();
    text_table(ui, "describe", &headers, &rows);
}

pub fn class_table(ui: &mut Ui, classes: &[ClassCount]) {
    let headers = vec![
        "Classe".to_string(),
        "Nombre".to_string(),
        "Pourcentage".to_string(),
    ];
    let rows: Vec<Vec<String>> = classes
        .iter()
        .map(|c| vec![c.class.clone(), c.count.to_string(), format!("{:.2}", c.percent)])
        .collect();
    text_table(ui, "classes", &headers, &rows);
}

/// Missing-value report with each numeric cell shaded on the `Reds` map,
/// scaled per column.
pub fn missing_table(ui: &mut Ui, report: &MissingReport) {
    let max_count = report.max_missing().max(1) as f64;
    let max_pct = report
        .rows
        .iter()
        .map(|r| r.percent)
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    ui.push_id("missing", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(false)
            .vscroll(false)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(100.0))
            .columns(Column::auto().at_least(140.0), 2)
            .header(ROW_HEIGHT, |mut header| {
                for h in ["", "Valeurs_manquantes", "Pourcentage_manquant (%)"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for row in &report.rows {
                    body.row(ROW_HEIGHT, |mut tr| {
                        tr.col(|ui: &mut Ui| {
                            ui.strong(row.column.as_str());
                        });
                        shaded_cell(&mut tr, row.missing.to_string(), row.missing as f64 / max_count);
                        shaded_cell(&mut tr, format!("{:.2}", row.percent), row.percent / max_pct);
                    });
                }
            });
    });
}

fn shaded_cell(tr: &mut egui_extras::TableRow<'_, '_>, text: String, t: f64) {
    let bg = Colormap::Reds.sample(t);
    tr.col(|ui: &mut Ui| {
        ui.painter().rect_filled(ui.max_rect(), 0.0, bg);
        ui.label(RichText::new(text).color(contrast_text(bg)));
    });
}

/// Correlation of each column with the class rank.
pub fn correlation_list(ui: &mut Ui, against: &[(String, f64)]) {
    let headers = vec!["Variable".to_string(), "Corrélation".to_string()];
    let rows: Vec<Vec<String>> = against
        .iter()
        .map(|(name, r)| vec![name.clone(), fmt_num(*r)])
        .collect();
    egui::CollapsingHeader::new("Valeurs")
        .default_open(false)
        .show(ui, |ui: &mut Ui| text_table(ui, "against_class", &headers, &rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(25.0), "25");
        assert_eq!(fmt_num(1.23456), "1.235");
        assert_eq!(fmt_num(f64::NAN), "NaN");
    }
}
