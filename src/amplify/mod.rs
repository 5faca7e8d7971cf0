/// Amplitude engine: scale or align the amplitudes inside a selected window.
///
/// Pipeline:
/// ```text
///  points ──► window ──► BooleanMask ──► transition ──► BlendGrid ─┐
///                            │            (distance)               │
///                            └──► rms ──► target amplification ────┤
///                                                                  ▼
///                              multiplier = 1 + blend · (target − 1)
///                              output     = input · multiplier
/// ```

pub mod distance;
pub mod rms;
pub mod transition;
pub mod window;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::model::{sample_index, BooleanMask, Bounds, Grid, Point, SeismicGrid};
use crate::error::{Error, Result};

pub use distance::{chamfer_distance, Sampling};
pub use rms::rms;
pub use transition::{transition_mask, Transition, TransitionMode};
pub use window::rasterize_window;

/// Windows quieter than this are left alone in align mode.
const SILENT_RMS: f32 = 1e-9;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// How the target amplification is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Multiply the window by a fixed factor.
    Scale { factor: f32 },
    /// Match the window's RMS to its surroundings: the window's bounding
    /// box grown by the given widths, minus the window itself.
    Align { width_traces: i32, width_ms: f32 },
}

impl Default for ProcessingMode {
    fn default() -> Self {
        ProcessingMode::Scale { factor: 1.0 }
    }
}

/// Everything [`amplify_window`] needs besides the data and the window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmplifyParams {
    pub mode: ProcessingMode,
    pub transition: Transition,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Output of one engine call. All three grids share the input's shape and
/// `output[c] == input[c] * multiplier[c]` holds for every cell.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplifyResult {
    pub output: SeismicGrid,
    /// `1.0` where the window has no influence.
    pub multiplier: Grid<f32>,
    pub window: BooleanMask,
}

impl AmplifyResult {
    fn unchanged(grid: &SeismicGrid) -> Self {
        AmplifyResult {
            output: grid.clone(),
            multiplier: Grid::filled(grid.shape(), 1.0),
            window: BooleanMask::filled(grid.shape(), false),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Amplify or align `grid` inside the window described by `points`.
///
/// Fails on an empty grid. With no points, or a window that rasterizes to
/// nothing, the input comes back unchanged. Otherwise the sampling
/// interval must be a positive number.
pub fn amplify_window(
    grid: &SeismicGrid,
    dt_ms: f32,
    points: &[Point],
    params: &AmplifyParams,
) -> Result<AmplifyResult> {
    if grid.is_empty() {
        return Err(Error::Input("seismic data is empty".into()));
    }
    if points.is_empty() {
        log::debug!("No selection points; data left unchanged");
        return Ok(AmplifyResult::unchanged(grid));
    }
    if !(dt_ms.is_finite() && dt_ms > 0.0) {
        return Err(Error::Input(format!("sample interval {dt_ms} ms is not positive")));
    }

    let window = rasterize_window(grid.shape(), points, dt_ms);
    if !window.any() {
        log::debug!("Window is empty; data left unchanged");
        return Ok(AmplifyResult::unchanged(grid));
    }

    let blend = transition_mask(&window, &params.transition, dt_ms);
    let target = target_amplification(grid, &window, dt_ms, &params.mode);
    log::debug!(
        "Window covers {} cells, {:?}, target amplification {target:.4}",
        window.count(),
        params.mode
    );

    let n = grid.n_samples();
    let mut output = grid.clone();
    let mut multiplier = Grid::filled(grid.shape(), 1.0f32);
    output
        .as_mut_slice()
        .par_chunks_mut(n)
        .zip(multiplier.as_mut_slice().par_chunks_mut(n))
        .zip(blend.as_slice().par_chunks(n))
        .for_each(|((out, mul), weights)| {
            for ((o, m), &w) in out.iter_mut().zip(mul.iter_mut()).zip(weights) {
                *m = 1.0 + w * (target - 1.0);
                *o *= *m;
            }
        });

    Ok(AmplifyResult {
        output,
        multiplier,
        window,
    })
}

fn target_amplification(
    grid: &SeismicGrid,
    window: &BooleanMask,
    dt_ms: f32,
    mode: &ProcessingMode,
) -> f32 {
    match *mode {
        ProcessingMode::Scale { factor } => factor,
        ProcessingMode::Align {
            width_traces,
            width_ms,
        } => {
            let rms_window = rms(grid, window);
            let surrounding = surrounding_mask(window, width_traces, width_ms, dt_ms);
            let rms_surrounding = if surrounding.any() {
                rms(grid, &surrounding)
            } else {
                rms_window
            };
            log::debug!("RMS window {rms_window:.6}, surrounding {rms_surrounding:.6}");
            if rms_window > SILENT_RMS {
                rms_surrounding / rms_window
            } else {
                1.0
            }
        }
    }
}

/// Inclusive bounding box of the set cells, `None` for an empty mask.
pub fn mask_bounds(mask: &BooleanMask) -> Option<Bounds> {
    mask.bounds()
}

/// Cells of the window's bounding box grown by `width_traces` traces and
/// `width_ms` on every side (clipped to the grid), minus the window.
///
/// Negative widths are treated as zero.
pub fn surrounding_mask(
    window: &BooleanMask,
    width_traces: i32,
    width_ms: f32,
    dt_ms: f32,
) -> BooleanMask {
    let shape = window.shape();
    let mut surrounding = BooleanMask::filled(shape, false);
    let Some(b) = mask_bounds(window) else {
        return surrounding;
    };

    let grow_t = width_traces.max(0) as usize;
    let grow_s = sample_index(width_ms, dt_ms).max(0) as usize;
    let t0 = b.min_trace.saturating_sub(grow_t);
    let t1 = (b.max_trace + grow_t).min(shape.n_traces - 1);
    let s0 = b.min_sample.saturating_sub(grow_s);
    let s1 = (b.max_sample + grow_s).min(shape.n_samples - 1);

    for t in t0..=t1 {
        let inside = window.trace(t);
        for (s, cell) in surrounding.trace_mut(t).iter_mut().enumerate().take(s1 + 1).skip(s0) {
            *cell = !inside[s];
        }
    }
    surrounding
}
