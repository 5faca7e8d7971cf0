use crate::data::model::{BooleanMask, Grid};

/// Physical length of one step along each grid axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub trace_step: f32,
    pub time_step: f32,
}

impl Sampling {
    pub fn new(trace_step: f32, time_step: f32) -> Self {
        Sampling {
            trace_step,
            time_step,
        }
    }

    fn diagonal(&self) -> f32 {
        (self.trace_step * self.trace_step + self.time_step * self.time_step).sqrt()
    }
}

/// Two-pass chamfer distance from every set cell to the nearest unset one.
///
/// Unset cells are the zero-distance seeds. Set cells with no reachable
/// seed stay at `f32::INFINITY`. Each pass relaxes against three
/// already-visited neighbours (trace, sample and their diagonal), so the
/// result is exact next to the boundary and an overestimate further away.
pub fn chamfer_distance(mask: &BooleanMask, sampling: Sampling) -> Grid<f32> {
    let shape = mask.shape();
    let mut dist = mask.map(|&inside| if inside { f32::INFINITY } else { 0.0 });
    if shape.is_empty() {
        return dist;
    }
    let (nt, ns) = (shape.n_traces, shape.n_samples);
    let diagonal = sampling.diagonal();

    // Forward: ascending trace, ascending sample.
    for i in 0..nt {
        for j in 0..ns {
            if !mask[(i, j)] {
                continue;
            }
            let mut d = dist[(i, j)];
            if i > 0 {
                d = d.min(dist[(i - 1, j)] + sampling.trace_step);
            }
            if j > 0 {
                d = d.min(dist[(i, j - 1)] + sampling.time_step);
            }
            if i > 0 && j > 0 {
                d = d.min(dist[(i - 1, j - 1)] + diagonal);
            }
            dist[(i, j)] = d;
        }
    }

    // Backward: descending trace, descending sample.
    for i in (0..nt).rev() {
        for j in (0..ns).rev() {
            if !mask[(i, j)] {
                continue;
            }
            let mut d = dist[(i, j)];
            if i + 1 < nt {
                d = d.min(dist[(i + 1, j)] + sampling.trace_step);
            }
            if j + 1 < ns {
                d = d.min(dist[(i, j + 1)] + sampling.time_step);
            }
            if i + 1 < nt && j + 1 < ns {
                d = d.min(dist[(i + 1, j + 1)] + diagonal);
            }
            dist[(i, j)] = d;
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::data::model::Shape;

    #[test]
    fn all_background_is_zero() {
        let mask = BooleanMask::filled(Shape::new(4, 5), false);
        let d = chamfer_distance(&mask, Sampling::new(1.0, 1.0));
        assert!(d.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn no_background_stays_infinite() {
        let mask = BooleanMask::filled(Shape::new(3, 3), true);
        let d = chamfer_distance(&mask, Sampling::new(1.0, 1.0));
        assert!(d.as_slice().iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn anisotropic_steps_along_each_axis() {
        // One seed at (0, 0), everything else set.
        let mut mask = BooleanMask::filled(Shape::new(3, 3), true);
        mask[(0, 0)] = false;
        let d = chamfer_distance(&mask, Sampling::new(2.0, 0.5));
        assert_eq!(d[(0, 0)], 0.0);
        assert_relative_eq!(d[(1, 0)], 2.0);
        assert_relative_eq!(d[(2, 0)], 4.0);
        assert_relative_eq!(d[(0, 2)], 1.0);
        assert_relative_eq!(d[(1, 1)], (4.25f32).sqrt());
    }

    #[test]
    fn interior_of_a_block_measures_to_its_edge() {
        // 7×7 block of set cells surrounded by a one-cell background ring.
        let mut mask = BooleanMask::filled(Shape::new(9, 9), false);
        for t in 1..8 {
            for s in 1..8 {
                mask[(t, s)] = true;
            }
        }
        let d = chamfer_distance(&mask, Sampling::new(1.0, 1.0));
        assert_relative_eq!(d[(1, 4)], 1.0);
        assert_relative_eq!(d[(2, 4)], 2.0);
        assert_relative_eq!(d[(4, 4)], 4.0);
        assert!(d.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn anti_diagonal_is_not_a_neighbour() {
        // Only seed is up-right of the cell; the chamfer passes never use
        // the (prev trace, next sample) diagonal.
        let mut mask = BooleanMask::filled(Shape::new(2, 2), true);
        mask[(0, 1)] = false;
        let d = chamfer_distance(&mask, Sampling::new(1.0, 1.0));
        assert_relative_eq!(d[(1, 0)], 2.0);
    }
}
