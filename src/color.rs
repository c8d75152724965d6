use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sequential colour maps: value in [0, 1] → Color32
// ---------------------------------------------------------------------------

/// Sequential colour maps, each defined by evenly spaced sRGB stops and
/// interpolated in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// White to dark red; used for the missing-value table.
    Reds,
    /// Dark purple to yellow; used for the missingness heat map.
    Plasma,
    /// Dark rose to white; used for the correlation heat map.
    Pink,
    /// Purple to yellow; used for class bars.
    Viridis,
}

impl Colormap {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            Colormap::Reds => &[(255, 245, 240), (252, 146, 114), (203, 24, 29), (103, 0, 13)],
            Colormap::Plasma => &[
                (13, 8, 135),
                (126, 3, 168),
                (204, 71, 120),
                (248, 149, 64),
                (240, 249, 33),
            ],
            Colormap::Pink => &[(30, 0, 0), (177, 107, 107), (220, 200, 150), (255, 255, 255)],
            Colormap::Viridis => &[
                (68, 1, 84),
                (59, 82, 139),
                (33, 145, 140),
                (94, 201, 98),
                (253, 231, 37),
            ],
        }
    }

    /// Colour at position `t`, clamped to [0, 1]. NaN maps to grey.
    pub fn sample(self, t: f64) -> Color32 {
        if t.is_nan() {
            return Color32::GRAY;
        }
        let stops = self.stops();
        let scaled = t.clamp(0.0, 1.0) as f32 * (stops.len() - 1) as f32;
        let lo = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lo as f32;

        let mixed = linear(stops[lo]).mix(linear(stops[lo + 1]), frac);
        let rgb = Srgb::<f32>::from_linear(mixed).into_format::<u8>();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// `n` colours spread across the whole map.
    pub fn spread(self, n: usize) -> Vec<Color32> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Black or white, whichever reads better on `bg`.
pub fn contrast_text(bg: Color32) -> Color32 {
    let luma = 0.299 * bg.r() as f32 + 0.587 * bg.g() as f32 + 0.114 * bg.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Group colours: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the group labels of a plot (e.g. air-quality classes) to distinct
/// colours, in label order.
#[derive(Debug, Clone)]
pub struct GroupColors {
    mapping: Vec<(String, Color32)>,
    default_color: Color32,
}

impl GroupColors {
    pub fn new(labels: &[String]) -> Self {
        let palette = generate_palette(labels.len());
        GroupColors {
            mapping: labels.iter().cloned().zip(palette).collect(),
            default_color: Color32::LIGHT_BLUE,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(self.default_color)
    }
}
