use amptune::data::SeismicGrid;
use eframe::egui::{Color32, ColorImage};
use palette::{LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

/// Lookup table resolution.
const LUT_SIZE: usize = 256;

/// Upper bound on values sorted for the percentile estimate.
const PERCENTILE_SAMPLES: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Colour schemes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Gray,
    /// Diverging blue / white / red.
    Seismic,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 2] = [ColorScheme::Gray, ColorScheme::Seismic];

    pub fn label(self) -> &'static str {
        match self {
            ColorScheme::Gray => "Gray",
            ColorScheme::Seismic => "Seismic",
        }
    }

    fn stops(self) -> &'static [(f32, f32, f32)] {
        match self {
            ColorScheme::Gray => &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0)],
            ColorScheme::Seismic => &[
                (0.0, 0.0, 0.3),
                (0.0, 0.0, 1.0),
                (1.0, 1.0, 1.0),
                (1.0, 0.0, 0.0),
                (0.5, 0.0, 0.0),
            ],
        }
    }

    /// Evenly spaced stops blended in linear light.
    pub fn lut(self) -> Vec<Color32> {
        let stops: Vec<LinSrgb> = self
            .stops()
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_linear())
            .collect();
        let segments = (stops.len() - 1) as f32;

        (0..LUT_SIZE)
            .map(|i| {
                let x = i as f32 / (LUT_SIZE - 1) as f32 * segments;
                let k = (x.floor() as usize).min(stops.len() - 2);
                let mixed = stops[k].mix(stops[k + 1], x - k as f32);
                let rgb: Srgb<u8> = Srgb::from_linear(mixed);
                Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Amplitude range
// ---------------------------------------------------------------------------

/// Display range clipped to the 1st and 99th percentile of `grid`.
///
/// Large sections are subsampled with a fixed stride before sorting.
pub fn percentile_range(grid: &SeismicGrid) -> (f32, f32) {
    let cells = grid.as_slice();
    let stride = cells.len().div_ceil(PERCENTILE_SAMPLES).max(1);
    let mut values: Vec<f32> = cells
        .iter()
        .step_by(stride)
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return (-1.0, 1.0);
    }
    values.sort_unstable_by(f32::total_cmp);

    let at = |p: f32| {
        let idx = (p * (values.len() - 1) as f32).round() as usize;
        values[idx.min(values.len() - 1)]
    };
    let (lo, hi) = (at(0.01), at(0.99));
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

// ---------------------------------------------------------------------------
// Section image
// ---------------------------------------------------------------------------

/// Render `grid` as an image with traces along x and samples along y.
///
/// Sections larger than `max_side` on either axis are decimated by an
/// integer step; the image only serves display.
pub fn render_section(
    grid: &SeismicGrid,
    range: (f32, f32),
    scheme: ColorScheme,
    max_side: usize,
) -> ColorImage {
    let (nt, ns) = (grid.n_traces(), grid.n_samples());
    if nt == 0 || ns == 0 {
        return ColorImage::new([1, 1], Color32::BLACK);
    }
    let max_side = max_side.max(1);
    let step_t = nt.div_ceil(max_side);
    let step_s = ns.div_ceil(max_side);
    let (w, h) = (nt.div_ceil(step_t), ns.div_ceil(step_s));
    if step_t > 1 || step_s > 1 {
        log::debug!("Decimating {nt}×{ns} section to {w}×{h} for display");
    }

    let lut = scheme.lut();
    let (lo, hi) = range;
    let span = (hi - lo).max(f32::EPSILON);
    let top = (LUT_SIZE - 1) as f32;

    let mut image = ColorImage::new([w, h], Color32::BLACK);
    for x in 0..w {
        let trace = grid.trace(x * step_t);
        for y in 0..h {
            let v = trace[y * step_s];
            let u = ((v - lo) / span).clamp(0.0, 1.0);
            let idx = if u.is_nan() { 0 } else { (u * top).round() as usize };
            image.pixels[y * w + x] = lut[idx];
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use amptune::data::Shape;

    use super::*;

    #[test]
    fn lut_endpoints() {
        let gray = ColorScheme::Gray.lut();
        assert_eq!(gray.len(), LUT_SIZE);
        assert_eq!(gray[0], Color32::BLACK);
        assert_eq!(gray[LUT_SIZE - 1], Color32::WHITE);

        let seismic = ColorScheme::Seismic.lut();
        let mid = seismic[LUT_SIZE / 2];
        assert!(mid.r() > 240 && mid.g() > 240 && mid.b() > 240);
        assert!(seismic[LUT_SIZE / 4].b() > seismic[LUT_SIZE / 4].r());
        assert!(seismic[3 * LUT_SIZE / 4].r() > seismic[3 * LUT_SIZE / 4].b());
    }

    #[test]
    fn percentiles_ignore_outliers() {
        let mut cells: Vec<f32> = (0..=100).map(|v| v as f32).collect();
        cells[50] = 1e9;
        let grid = SeismicGrid::from_vec(Shape::new(1, 101), cells).unwrap();
        let (lo, hi) = percentile_range(&grid);
        assert_eq!(lo, 1.0);
        assert_eq!(hi, 100.0);
    }

    #[test]
    fn flat_section_gets_a_non_empty_range() {
        let grid = SeismicGrid::filled(Shape::new(3, 3), 4.0);
        let (lo, hi) = percentile_range(&grid);
        assert!(hi > lo);
    }

    #[test]
    fn image_is_trace_by_sample() {
        let mut grid = SeismicGrid::filled(Shape::new(3, 5), 0.0);
        grid[(2, 4)] = 1.0;
        let img = render_section(&grid, (0.0, 1.0), ColorScheme::Gray, 4096);
        assert_eq!(img.size, [3, 5]);
        assert_eq!(img.pixels[4 * 3 + 2], Color32::WHITE);
        assert_eq!(img.pixels[0], Color32::BLACK);
    }

    #[test]
    fn large_sections_are_decimated() {
        let grid = SeismicGrid::filled(Shape::new(10, 9), 0.0);
        let img = render_section(&grid, (0.0, 1.0), ColorScheme::Gray, 4);
        // Steps of 3 along both axes.
        assert_eq!(img.size, [4, 3]);
    }
}
