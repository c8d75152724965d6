use eframe::egui::{Align2, FontId, Pos2, Rect, Sense, Ui, Vec2};

use crate::analysis::correlation::CorrelationMatrix;
use crate::color::{Colormap, contrast_text};

/// Upper bound on drawn row bands; larger tables are binned.
const MAX_BANDS: usize = 300;
const LABEL_FONT: f32 = 11.0;

/// Fraction of missing cells per column in consecutive row bands, at most
/// `MAX_BANDS` of them.
pub fn band_fractions(matrix: &[Vec<bool>], width: usize) -> Vec<Vec<f64>> {
    if matrix.is_empty() || width == 0 {
        return Vec::new();
    }
    let band_size = matrix.len().div_ceil(MAX_BANDS);
    matrix
        .chunks(band_size)
        .map(|band| {
            (0..width)
                .map(|c| {
                    let missing = band.iter().filter(|row| row.get(c) == Some(&true)).count();
                    missing as f64 / band.len() as f64
                })
                .collect()
        })
        .collect()
}

/// Missing cells as a column × row heat map on the plasma scale.
pub fn missingness(ui: &mut Ui, columns: &[String], matrix: &[Vec<bool>]) {
    let bands = band_fractions(matrix, columns.len());
    if bands.is_empty() {
        ui.label("Aucune donnée.");
        return;
    }

    let label_h = 70.0;
    let width = ui.available_width().max(200.0);
    let height = 320.0;
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height + label_h), Sense::hover());
    let area = Rect::from_min_size(response.rect.min, Vec2::new(width, height));

    let cell_w = width / columns.len() as f32;
    let cell_h = height / bands.len() as f32;
    for (r, band) in bands.iter().enumerate() {
        for (c, &frac) in band.iter().enumerate() {
            let min = area.min + Vec2::new(c as f32 * cell_w, r as f32 * cell_h);
            painter.rect_filled(
                Rect::from_min_size(min, Vec2::new(cell_w, cell_h)),
                0.0,
                Colormap::Plasma.sample(frac),
            );
        }
    }

    let text_color = ui.visuals().text_color();
    for (c, name) in columns.iter().enumerate() {
        let pos = Pos2::new(area.min.x + (c as f32 + 0.5) * cell_w, area.max.y + 4.0);
        painter.text(pos, Align2::CENTER_TOP, name, FontId::proportional(LABEL_FONT), text_color);
    }

    legend_bar(ui, Colormap::Plasma, "présent", "manquant");
}

/// Pearson coefficients as an annotated square grid on the pink scale.
pub fn correlation(ui: &mut Ui, matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        ui.label("Aucune variable numérique.");
        return;
    }
    let n = matrix.len();

    let label_w = 90.0;
    let side = ((ui.available_width() - label_w) / n as f32).clamp(34.0, 80.0);
    let size = Vec2::new(label_w + side * n as f32, side * n as f32 + 24.0);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::new(label_w, 0.0);
    let font = FontId::proportional(LABEL_FONT);
    let text_color = ui.visuals().text_color();

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i, j);
            let rect = Rect::from_min_size(
                origin + Vec2::new(j as f32 * side, i as f32 * side),
                Vec2::splat(side),
            );
            let bg = Colormap::Pink.sample((r + 1.0) / 2.0);
            painter.rect_filled(rect, 0.0, bg);
            let label = if r.is_nan() { "NaN".to_string() } else { format!("{r:.2}") };
            painter.text(rect.center(), Align2::CENTER_CENTER, label, font.clone(), contrast_text(bg));
        }

        let name = &matrix.names[i];
        painter.text(
            Pos2::new(origin.x - 4.0, origin.y + (i as f32 + 0.5) * side),
            Align2::RIGHT_CENTER,
            name,
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(origin.x + (i as f32 + 0.5) * side, origin.y + n as f32 * side + 4.0),
            Align2::CENTER_TOP,
            name,
            font.clone(),
            text_color,
        );
    }

    legend_bar(ui, Colormap::Pink, "-1", "1");
}

/// Horizontal colour scale with end labels.
fn legend_bar(ui: &mut Ui, map: Colormap, low: &str, high: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(low);
        let (response, painter) = ui.allocate_painter(Vec2::new(160.0, 12.0), Sense::hover());
        let steps = 32;
        let w = response.rect.width() / steps as f32;
        for s in 0..steps {
            let min = response.rect.min + Vec2::new(s as f32 * w, 0.0);
            painter.rect_filled(
                Rect::from_min_size(min, Vec2::new(w + 0.5, response.rect.height())),
                0.0,
                map.sample(s as f64 / (steps - 1) as f64),
            );
        }
        ui.label(high);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_tables_keep_one_band_per_row() {
        let matrix = vec![vec![true, false], vec![false, false]];
        assert_eq!(band_fractions(&matrix, 2), vec![vec![1.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn large_tables_are_binned() {
        let matrix: Vec<Vec<bool>> = (0..1000).map(|i| vec![i % 2 == 0]).collect();
        let bands = band_fractions(&matrix, 1);
        assert!(bands.len() <= MAX_BANDS);
        assert!(bands.iter().all(|b| (b[0] - 0.5).abs() < 1e-9));
    }

    #[test]
    fn empty_input_has_no_bands() {
        assert!(band_fractions(&[], 3).is_empty());
    }
}
