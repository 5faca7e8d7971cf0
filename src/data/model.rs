use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Shape – dimensions of a trace grid
// ---------------------------------------------------------------------------

/// Grid dimensions: number of traces (x) by samples per trace (time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    pub n_traces: usize,
    pub n_samples: usize,
}

impl Shape {
    pub fn new(n_traces: usize, n_samples: usize) -> Self {
        Shape {
            n_traces,
            n_samples,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.n_traces * self.n_samples
    }

    /// Whether the shape holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `(trace, sample)` is a valid cell for this shape.
    pub fn contains(&self, trace: i64, sample: i64) -> bool {
        trace >= 0
            && sample >= 0
            && (trace as u64) < self.n_traces as u64
            && (sample as u64) < self.n_samples as u64
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} traces × {} samples", self.n_traces, self.n_samples)
    }
}

// ---------------------------------------------------------------------------
// Point – a selection vertex in (trace, time) space
// ---------------------------------------------------------------------------

/// A window vertex. The trace axis is discrete, time is continuous and is
/// converted to a sample index through the sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub trace: i32,
    pub time_ms: f32,
}

impl Point {
    pub fn new(trace: i32, time_ms: f32) -> Self {
        Point { trace, time_ms }
    }
}

/// Sample index nearest to `time_ms`.
pub fn sample_index(time_ms: f32, dt_ms: f32) -> i64 {
    (time_ms / dt_ms).round() as i64
}

// ---------------------------------------------------------------------------
// Grid – flat [trace][sample] storage
// ---------------------------------------------------------------------------

/// Rectangular 2D grid stored trace-major in one contiguous buffer.
///
/// Cell `(t, s)` lives at `t * n_samples + s`, so every trace is a
/// contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    shape: Shape,
    cells: Vec<T>,
}

/// Seismic amplitudes, `[trace][sample]`.
pub type SeismicGrid = Grid<f32>;

/// Membership grid congruent to a [`SeismicGrid`].
pub type BooleanMask = Grid<bool>;

/// Continuous blend weights in `[0, 1]`.
pub type BlendGrid = Grid<f32>;

impl<T: Clone> Grid<T> {
    /// A grid of `shape` with every cell set to `value`.
    pub fn filled(shape: Shape, value: T) -> Self {
        Grid {
            shape,
            cells: vec![value; shape.len()],
        }
    }

    /// Build from nested traces. All traces must share one length.
    pub fn from_traces(traces: Vec<Vec<T>>) -> Result<Self> {
        let n_traces = traces.len();
        let n_samples = traces.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(n_traces * n_samples);
        for (i, trace) in traces.into_iter().enumerate() {
            if trace.len() != n_samples {
                return Err(Error::Input(format!(
                    "trace {i} has {} samples, expected {n_samples}",
                    trace.len()
                )));
            }
            cells.extend(trace);
        }
        Ok(Grid {
            shape: Shape::new(n_traces, n_samples),
            cells,
        })
    }

    /// Copy the grid out as one vector per trace.
    pub fn to_nested(&self) -> Vec<Vec<T>> {
        self.traces().map(<[T]>::to_vec).collect()
    }
}

impl<T> Grid<T> {
    /// Wrap an existing trace-major buffer.
    pub fn from_vec(shape: Shape, cells: Vec<T>) -> Result<Self> {
        if cells.len() != shape.len() {
            return Err(Error::Input(format!(
                "buffer holds {} cells, shape {shape} needs {}",
                cells.len(),
                shape.len()
            )));
        }
        Ok(Grid { shape, cells })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn n_traces(&self) -> usize {
        self.shape.n_traces
    }

    pub fn n_samples(&self) -> usize {
        self.shape.n_samples
    }

    /// True when the grid has no traces or no samples.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn get(&self, trace: usize, sample: usize) -> Option<&T> {
        if trace < self.shape.n_traces && sample < self.shape.n_samples {
            self.cells.get(trace * self.shape.n_samples + sample)
        } else {
            None
        }
    }

    /// One trace as a contiguous slice.
    ///
    /// # Panics
    /// If `index >= n_traces`.
    pub fn trace(&self, index: usize) -> &[T] {
        let n = self.shape.n_samples;
        &self.cells[index * n..(index + 1) * n]
    }

    pub fn trace_mut(&mut self, index: usize) -> &mut [T] {
        let n = self.shape.n_samples;
        &mut self.cells[index * n..(index + 1) * n]
    }

    /// Iterate traces in order.
    pub fn traces(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        let n = self.shape.n_samples;
        (0..self.shape.n_traces).map(move |i| &self.cells[i * n..(i + 1) * n])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Cell-wise conversion into a congruent grid.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            shape: self.shape,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (trace, sample): (usize, usize)) -> &T {
        debug_assert!(sample < self.shape.n_samples);
        &self.cells[trace * self.shape.n_samples + sample]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (trace, sample): (usize, usize)) -> &mut T {
        debug_assert!(sample < self.shape.n_samples);
        &mut self.cells[trace * self.shape.n_samples + sample]
    }
}

// ---------------------------------------------------------------------------
// Mask helpers
// ---------------------------------------------------------------------------

/// Inclusive axis-aligned bounding box in cell indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_trace: usize,
    pub max_trace: usize,
    pub min_sample: usize,
    pub max_sample: usize,
}

impl Grid<bool> {
    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Whether any cell is set.
    pub fn any(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    /// Complement of the mask.
    pub fn inverted(&self) -> Self {
        self.map(|&c| !c)
    }

    /// Bounding box of the set cells, `None` for an empty mask.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for (t, trace) in self.traces().enumerate() {
            let Some(first) = trace.iter().position(|&c| c) else {
                continue;
            };
            let last = trace.iter().rposition(|&c| c).unwrap_or(first);
            bounds = Some(match bounds {
                None => Bounds {
                    min_trace: t,
                    max_trace: t,
                    min_sample: first,
                    max_sample: last,
                },
                Some(b) => Bounds {
                    min_trace: b.min_trace,
                    max_trace: t,
                    min_sample: b.min_sample.min(first),
                    max_sample: b.max_sample.max(last),
                },
            });
        }
        bounds
    }

    /// Cast to `{0.0, 1.0}` weights.
    pub fn to_weights(&self) -> BlendGrid {
        self.map(|&c| if c { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_traces_rejects_ragged_rows() {
        let err = Grid::from_traces(vec![vec![1.0f32, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn traces_are_contiguous_rows() {
        let g = Grid::from_traces(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(g.shape(), Shape::new(2, 3));
        assert_eq!(g.trace(1), &[4, 5, 6]);
        assert_eq!(g[(0, 2)], 3);
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.to_nested(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn mask_bounds_cover_all_set_cells() {
        let mut m = BooleanMask::filled(Shape::new(6, 8), false);
        assert_eq!(m.bounds(), None);
        m[(1, 5)] = true;
        m[(4, 2)] = true;
        m[(3, 7)] = true;
        assert_eq!(
            m.bounds(),
            Some(Bounds {
                min_trace: 1,
                max_trace: 4,
                min_sample: 2,
                max_sample: 7,
            })
        );
        assert_eq!(m.count(), 3);
        assert_eq!(m.inverted().count(), 45);
    }

    #[test]
    fn sample_index_rounds_to_nearest() {
        assert_eq!(sample_index(10.0, 10.0), 1);
        assert_eq!(sample_index(14.9, 10.0), 1);
        assert_eq!(sample_index(15.1, 10.0), 2);
        assert_eq!(sample_index(-6.0, 4.0), -2);
    }
}
