use serde::{Deserialize, Serialize};

use crate::data::model::{BlendGrid, BooleanMask};

use super::distance::{chamfer_distance, Sampling};

/// Which side of the window boundary the blend ramp lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Full weight inside, decaying to zero outside the window.
    Outside,
    /// Zero at the window edge, rising to full weight at its centre.
    #[default]
    Inside,
}

impl TransitionMode {
    pub const ALL: [TransitionMode; 2] = [TransitionMode::Inside, TransitionMode::Outside];

    pub fn label(self) -> &'static str {
        match self {
            TransitionMode::Outside => "outside",
            TransitionMode::Inside => "inside",
        }
    }
}

/// Width and placement of the blend ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub width_traces: i32,
    pub width_ms: f32,
    pub mode: TransitionMode,
}

impl Default for Transition {
    fn default() -> Self {
        Transition {
            width_traces: 5,
            width_ms: 20.0,
            mode: TransitionMode::Inside,
        }
    }
}

impl Transition {
    /// Zero-width transition: the window mask is used as is.
    pub fn hard(mode: TransitionMode) -> Self {
        Transition {
            width_traces: 0,
            width_ms: 0.0,
            mode,
        }
    }
}

/// Turn a window mask into blend weights in `[0, 1]`.
///
/// Distances are scaled so that the configured widths measure `1.0`.
/// A non-positive width disables blending and returns the mask as
/// `{0, 1}` weights.
pub fn transition_mask(window: &BooleanMask, transition: &Transition, dt_ms: f32) -> BlendGrid {
    if transition.width_traces <= 0 || transition.width_ms <= 0.0 {
        return window.to_weights();
    }

    let width_samples = transition.width_ms / dt_ms;
    let sampling = Sampling::new(1.0 / transition.width_traces as f32, 1.0 / width_samples);

    match transition.mode {
        TransitionMode::Outside => {
            let distances = chamfer_distance(&window.inverted(), sampling);
            let mut blend = BlendGrid::filled(window.shape(), 0.0);
            for ((w, &inside), &d) in blend
                .as_mut_slice()
                .iter_mut()
                .zip(window.as_slice())
                .zip(distances.as_slice())
            {
                *w = if inside { 1.0 } else { (1.0 - d).clamp(0.0, 1.0) };
            }
            blend
        }
        TransitionMode::Inside => {
            let distances = chamfer_distance(window, sampling);
            let max_inside = window
                .as_slice()
                .iter()
                .zip(distances.as_slice())
                .filter(|&(&inside, _)| inside)
                .map(|(_, &d)| d)
                .fold(0.0f32, f32::max);

            // A window with no interior, or one with no outside cell to
            // measure from, gets the hard mask.
            if max_inside == 0.0 || !max_inside.is_finite() {
                log::warn!("Inside transition has no usable depth ({max_inside}); using hard mask");
                return window.to_weights();
            }

            let mut blend = BlendGrid::filled(window.shape(), 0.0);
            for ((w, &inside), &d) in blend
                .as_mut_slice()
                .iter_mut()
                .zip(window.as_slice())
                .zip(distances.as_slice())
            {
                if inside {
                    *w = d / max_inside;
                }
            }
            blend
        }
    }
}
