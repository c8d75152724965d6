use eframe::egui::{self, Color32, RichText, Ui};
use std::ops::RangeInclusive;

use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotUi, Points,
};

use crate::analysis::describe::ClassCount;
use crate::analysis::distribution::{BoxStats, Histogram};
use crate::color::{Colormap, GroupColors};
use crate::view::{MatrixCell, PlotMatrix};

/// Subplots per row in the per-column grids.
const GRID_COLUMNS: usize = 3;
const SUBPLOT_HEIGHT: f32 = 180.0;

const HIST_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const SCATTER_COLOR: Color32 = Color32::from_rgb(0, 128, 0);

/// Axis formatter that prints `labels[i]` at integer positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Lay out one small plot per item, `GRID_COLUMNS` to a row.
fn subplot_grid<T>(
    ui: &mut Ui,
    id: &str,
    items: &[(String, T)],
    mut draw: impl FnMut(&mut Ui, &str, &T, f32),
) {
    let spacing = ui.spacing().item_spacing.x;
    let width = ((ui.available_width() - spacing * GRID_COLUMNS as f32) / GRID_COLUMNS as f32)
        .max(120.0);

    egui::Grid::new(id)
        .num_columns(GRID_COLUMNS)
        .show(ui, |ui: &mut Ui| {
            for (i, (name, item)) in items.iter().enumerate() {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(name).strong());
                    draw(ui, name, item, width);
                });
                if (i + 1) % GRID_COLUMNS == 0 {
                    ui.end_row();
                }
            }
        });
}

/// A fixed-size, non-interactive plot.
fn small_plot(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    width: f32,
    height: f32,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .width(width)
        .height(height)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, add_contents);
}

// ---------------------------------------------------------------------------
// Descriptive view
// ---------------------------------------------------------------------------

/// One bar per class, coloured along the viridis map.
pub fn class_bars(ui: &mut Ui, classes: &[ClassCount]) {
    let colors = Colormap::Viridis.spread(classes.len());
    let bars: Vec<Bar> = classes
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (c, color))| {
            Bar::new(i as f64, c.count as f64)
                .width(0.7)
                .fill(color)
                .name(&c.class)
        })
        .collect();
    let labels = classes.iter().map(|c| c.class.clone()).collect();

    Plot::new("class_bars")
        .height(260.0)
        .x_axis_label("Classe")
        .y_axis_label("Nombre")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Visualizations view
// ---------------------------------------------------------------------------

pub fn histogram_grid(ui: &mut Ui, histograms: &[(String, Histogram)]) {
    subplot_grid(ui, "histograms", histograms, |ui, name, hist, width| {
        let bars: Vec<Bar> = hist
            .bars()
            .map(|(centre, n)| Bar::new(centre, n as f64).width(hist.bin_width()))
            .collect();
        small_plot(ui, ("hist", name), width, SUBPLOT_HEIGHT, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HIST_COLOR));
        });
    });
}

pub fn density_grid(ui: &mut Ui, curves: &[(String, Vec<[f64; 2]>)]) {
    subplot_grid(ui, "densities", curves, |ui, name, curve, width| {
        small_plot(ui, ("density", name), width, SUBPLOT_HEIGHT, |plot_ui| {
            plot_ui.line(Line::new(curve.clone()).color(HIST_COLOR).width(1.5));
        });
    });
}

pub fn box_grid(ui: &mut Ui, boxes: &[(String, BoxStats)]) {
    subplot_grid(ui, "boxplots", boxes, |ui, name, stats, width| {
        let elem = BoxElem::new(
            0.0,
            BoxSpread::new(
                stats.lower_whisker,
                stats.q1,
                stats.median,
                stats.q3,
                stats.upper_whisker,
            ),
        )
        .name(name)
        .box_width(0.4)
        .whisker_width(0.2);
        let outliers: Vec<[f64; 2]> = stats.outliers.iter().map(|&v| [0.0, v]).collect();

        small_plot(ui, ("box", name), width, SUBPLOT_HEIGHT, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).color(HIST_COLOR));
            plot_ui.points(Points::new(outliers).radius(2.5).color(Color32::DARK_GRAY));
        });
    });
}

/// Legend row for coloured groups.
fn group_legend(ui: &mut Ui, groups: &[String], colors: &GroupColors) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for g in groups {
            ui.label(RichText::new(format!("● {g}")).color(colors.color_for(g)));
        }
    });
}

/// All-pairs grid: scatter off the diagonal, density on it. Groups other
/// than the single unnamed one are coloured and given a legend.
pub fn matrix_grid(ui: &mut Ui, id: &str, matrix: &PlotMatrix) {
    let n = matrix.names.len();
    if n == 0 {
        ui.label("Aucune variable numérique.");
        return;
    }

    let grouped = !(matrix.groups.len() == 1 && matrix.groups[0].is_empty());
    let colors = GroupColors::new(&matrix.groups);
    if grouped {
        group_legend(ui, &matrix.groups, &colors);
    }
    let color_of = |label: &str| {
        if grouped {
            colors.color_for(label)
        } else {
            SCATTER_COLOR
        }
    };

    let label_width = 90.0;
    let size = ((ui.available_width() - label_width) / n as f32 - ui.spacing().item_spacing.x)
        .clamp(70.0, 220.0);

    egui::Grid::new(id)
        .num_columns(n + 1)
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            for (row, cells) in matrix.cells.iter().enumerate() {
                ui.label(RichText::new(&matrix.names[row]).small());
                for (col, cell) in cells.iter().enumerate() {
                    small_plot(ui, (id, row, col), size, size, |plot_ui| match cell {
                        MatrixCell::Scatter(series) => {
                            for s in series {
                                plot_ui.points(
                                    Points::new(s.points.clone())
                                        .radius(1.5)
                                        .color(color_of(&s.label)),
                                );
                            }
                        }
                        MatrixCell::Density(series) => {
                            for s in series {
                                plot_ui.line(
                                    Line::new(s.points.clone()).color(color_of(&s.label)),
                                );
                            }
                        }
                    });
                }
                ui.end_row();
            }

            ui.label("");
            for name in &matrix.names {
                ui.label(RichText::new(name).small());
            }
            ui.end_row();
        });
}

// ---------------------------------------------------------------------------
// Correlations view
// ---------------------------------------------------------------------------

/// Bars of each column's correlation with the class rank, already sorted.
pub fn correlation_bars(ui: &mut Ui, against: &[(String, f64)]) {
    let bars: Vec<Bar> = against
        .iter()
        .enumerate()
        .filter(|(_, (_, r))| !r.is_nan())
        .map(|(i, (name, r))| {
            let color = if *r >= 0.0 {
                Color32::from_rgb(214, 96, 77)
            } else {
                Color32::from_rgb(67, 147, 195)
            };
            Bar::new(i as f64, *r).width(0.7).fill(color).name(name)
        })
        .collect();
    let labels = against.iter().map(|(n, _)| n.clone()).collect();

    Plot::new("class_correlation")
        .height(260.0)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .include_y(-1.0)
        .include_y(1.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("class_num"));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_axis_labels_integer_marks_only() {
        let fmt = category_axis(vec!["bon".into(), "moyen".into()]);
        let range = 0.0..=1.0;
        let mark = |value| GridMark {
            value,
            step_size: 0.5,
        };
        assert_eq!(fmt(mark(1.0), &range), "moyen");
        assert_eq!(fmt(mark(0.5), &range), "");
        assert_eq!(fmt(mark(2.0), &range), "");
        assert_eq!(fmt(mark(-1.0), &range), "");
    }
}
