use std::path::{Path, PathBuf};

use amptune::amplify::{amplify_window, mask_bounds, rms};
use amptune::data::{open_segy, BooleanMask, Point, SeismicGrid, SegyWriter};
use anyhow::{bail, Context, Result};

use crate::color::percentile_range;
use crate::history::History;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Loaded file
// ---------------------------------------------------------------------------

/// The file the user opened and its untouched data.
pub struct Session {
    pub path: PathBuf,
    pub original: SeismicGrid,
    /// Sample interval in seconds, as stored in the file.
    pub dt: f64,
    /// Colour range from the original data; fixed for the session.
    pub display_range: (f32, f32),
}

impl Session {
    pub fn dt_ms(&self) -> f32 {
        (self.dt * 1000.0) as f32
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Last sample time in ms.
    pub fn max_time_ms(&self) -> f32 {
        self.original.n_samples().saturating_sub(1) as f32 * self.dt_ms()
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    PointByPoint,
    Rectangle,
}

impl SelectionMode {
    pub const ALL: [SelectionMode; 2] = [SelectionMode::PointByPoint, SelectionMode::Rectangle];

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::PointByPoint => "Point by point",
            SelectionMode::Rectangle => "Rectangle",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            SelectionMode::PointByPoint => {
                "Left click adds a point, right click or Enter applies, Esc clears"
            }
            SelectionMode::Rectangle => "Drag to draw, right click applies, Esc clears",
        }
    }
}

#[derive(Debug, Default)]
pub struct Selection {
    pub mode: SelectionMode,
    pub points: Vec<Point>,
    /// Anchor corner while a rectangle is being dragged.
    pub drag_start: Option<Point>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.points.clear();
        self.drag_start = None;
    }
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

pub struct Status {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub history: History,
    pub settings: Settings,
    pub selection: Selection,
    pub status: Option<Status>,
    /// The section image must be rebuilt before the next frame.
    pub texture_dirty: bool,
}

impl AppState {
    /// Data shown on screen: the current history entry.
    pub fn current_data(&self) -> Option<&SeismicGrid> {
        self.history.current().map(|e| &e.data)
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    /// Log a failed action and show it in the status line.
    pub fn report(&mut self, err: &anyhow::Error) {
        log::error!("{err:#}");
        self.status = Some(Status {
            text: format!("Error: {err:#}"),
            is_error: true,
        });
    }

    // -- File actions --

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let reader =
            open_segy(path).with_context(|| format!("Cannot open {}", path.display()))?;
        if reader.num_traces() == 0 {
            bail!("{} contains no traces", path.display());
        }
        if reader.dt() <= 0.0 {
            bail!("{} declares a zero sample interval", path.display());
        }
        let dt = reader.dt();
        let original = reader.into_traces();
        let display_range = percentile_range(&original);

        self.history.reset("Original data loaded", original.clone());
        self.session = Some(Session {
            path: path.to_path_buf(),
            original,
            dt,
            display_range,
        });
        self.selection.clear();
        self.texture_dirty = true;

        let session = self.session.as_ref().map(|s| (s.file_name(), s.original.shape()));
        if let Some((name, shape)) = session {
            self.set_info(format!("Loaded {name} ({shape})"));
        }
        Ok(())
    }

    /// Write the current data, reusing every header of the opened file.
    pub fn save(&mut self, target: &Path) -> Result<()> {
        let Some(session) = &self.session else {
            bail!("No data loaded");
        };
        let Some(data) = self.current_data() else {
            bail!("No data loaded");
        };
        SegyWriter::new(target, &session.path)
            .and_then(|writer| writer.write_file(data, session.dt))
            .with_context(|| format!("Cannot save {}", target.display()))?;
        self.set_info(format!("Saved {}", target.display()));
        Ok(())
    }

    // -- History actions --

    pub fn reset(&mut self) {
        if let Some(session) = &self.session {
            self.history
                .reset("Data reset to original", session.original.clone());
            self.selection.clear();
            self.texture_dirty = true;
        }
    }

    pub fn undo(&mut self) {
        if self.history.undo() {
            self.texture_dirty = true;
        }
    }

    pub fn redo(&mut self) {
        if self.history.redo() {
            self.texture_dirty = true;
        }
    }

    // -- Selection --

    /// Plot coordinates (x = trace, y = -time) to a selection vertex,
    /// clamped to the data extent with the trace rounded.
    pub fn to_point(&self, plot_x: f64, plot_y: f64) -> Option<Point> {
        let session = self.session.as_ref()?;
        let max_trace = session.original.n_traces().saturating_sub(1) as f64;
        let trace = plot_x.round().clamp(0.0, max_trace) as i32;
        let time_ms = (-plot_y as f32).clamp(0.0, session.max_time_ms());
        Some(Point::new(trace, time_ms))
    }

    pub fn add_point(&mut self, plot_x: f64, plot_y: f64) {
        if let Some(p) = self.to_point(plot_x, plot_y) {
            self.selection.points.push(p);
        }
    }

    pub fn start_rectangle(&mut self, plot_x: f64, plot_y: f64) {
        self.selection.clear();
        self.selection.drag_start = self.to_point(plot_x, plot_y);
    }

    pub fn drag_rectangle(&mut self, plot_x: f64, plot_y: f64) {
        let (Some(start), Some(end)) = (self.selection.drag_start, self.to_point(plot_x, plot_y))
        else {
            return;
        };
        self.selection.points = vec![start, end];
    }

    /// Run the engine if the selection is complete, otherwise drop it.
    pub fn finalize_selection(&mut self) -> Result<()> {
        let ready = match self.selection.mode {
            SelectionMode::PointByPoint => self.selection.points.len() >= 2,
            SelectionMode::Rectangle => self.selection.points.len() == 2,
        };
        if ready {
            self.apply_selection()
        } else {
            self.selection.clear();
            Ok(())
        }
    }

    /// Process the current data inside the selection and push the result.
    pub fn apply_selection(&mut self) -> Result<()> {
        let Some(session) = &self.session else {
            bail!("No data loaded");
        };
        let Some(data) = self.current_data() else {
            bail!("No data loaded");
        };

        let params = self.settings.to_params();
        let result = amplify_window(data, session.dt_ms(), &self.selection.points, &params)
            .context("Amplitude processing failed")?;

        let Some(bbox) = bounding_box(&result.window) else {
            self.selection.clear();
            self.set_info("Selection is outside the data; nothing changed");
            return Ok(());
        };
        log::debug!(
            "RMS in selection box: {:.6} before, {:.6} after",
            rms(data, &bbox),
            rms(&result.output, &bbox)
        );

        let description = self.settings.describe();
        self.history.push(description.clone(), result.output);
        self.selection.clear();
        self.texture_dirty = true;
        self.set_info(format!("Applied {description}"));
        Ok(())
    }
}

/// Filled axis-aligned box around the window.
fn bounding_box(window: &BooleanMask) -> Option<BooleanMask> {
    let b = mask_bounds(window)?;
    let mut bbox = BooleanMask::filled(window.shape(), false);
    for t in b.min_trace..=b.max_trace {
        bbox.trace_mut(t)[b.min_sample..=b.max_sample].fill(true);
    }
    Some(bbox)
}
