use crate::data::model::{sample_index, BooleanMask, Point, Shape};

// ---------------------------------------------------------------------------
// Window rasterization
// ---------------------------------------------------------------------------

/// Rasterize selection vertices into a window mask over `shape`.
///
/// * no points → empty mask
/// * one point → that single cell, or nothing if it falls outside
/// * two points → the inclusive axis-aligned rectangle they span
/// * three or more → the closed polygon, filled per trace column
pub fn rasterize_window(shape: Shape, points: &[Point], dt_ms: f32) -> BooleanMask {
    let mut mask = BooleanMask::filled(shape, false);
    if shape.is_empty() {
        return mask;
    }
    match points {
        [] => {}
        [p] => fill_point(&mut mask, p, dt_ms),
        [a, b] => fill_rectangle(&mut mask, a, b, dt_ms),
        polygon => fill_polygon(&mut mask, polygon, dt_ms),
    }
    mask
}

fn fill_point(mask: &mut BooleanMask, p: &Point, dt_ms: f32) {
    let trace = i64::from(p.trace);
    let sample = sample_index(p.time_ms, dt_ms);
    if mask.shape().contains(trace, sample) {
        mask[(trace as usize, sample as usize)] = true;
    }
}

fn fill_rectangle(mask: &mut BooleanMask, a: &Point, b: &Point, dt_ms: f32) {
    let shape = mask.shape();
    let (sa, sb) = (sample_index(a.time_ms, dt_ms), sample_index(b.time_ms, dt_ms));

    // Each bound is clipped on its own, so a rectangle past an edge
    // collapses onto that edge.
    let t0 = clip(i64::from(a.trace.min(b.trace)), shape.n_traces);
    let t1 = clip(i64::from(a.trace.max(b.trace)), shape.n_traces);
    let s0 = clip(sa.min(sb), shape.n_samples);
    let s1 = clip(sa.max(sb), shape.n_samples);

    for t in t0..=t1 {
        mask.trace_mut(t)[s0..=s1].fill(true);
    }
}

/// Even-odd scanline fill, one vertical scanline per trace.
fn fill_polygon(mask: &mut BooleanMask, polygon: &[Point], dt_ms: f32) {
    let shape = mask.shape();
    // Only columns inside the grid are scanned.
    let first = polygon.iter().map(|p| i64::from(p.trace)).min().unwrap_or(0).max(0);
    let last = polygon
        .iter()
        .map(|p| i64::from(p.trace))
        .max()
        .unwrap_or(-1)
        .min(shape.n_traces as i64 - 1);

    // Closing edge from the last vertex back to the first included.
    let edges: Vec<(&Point, &Point)> = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .collect();

    let mut crossings: Vec<f32> = Vec::new();
    for trace in first..=last {
        crossings.clear();
        let x = trace as f32;
        for &(p1, p2) in &edges {
            // Vertical edges never cross a vertical scanline.
            if p1.trace == p2.trace {
                continue;
            }
            let (x1, x2) = (p1.trace as f32, p2.trace as f32);
            let t = (x - x1) / (x2 - x1);
            if (0.0..=1.0).contains(&t) {
                crossings.push(p1.time_ms + t * (p2.time_ms - p1.time_ms));
            }
        }
        crossings.sort_by(f32::total_cmp);

        let column = mask.trace_mut(trace as usize);
        // An odd trailing crossing has no partner and is dropped.
        for pair in crossings.chunks_exact(2) {
            let start = clip(sample_index(pair[0], dt_ms), shape.n_samples);
            let end = clip(sample_index(pair[1], dt_ms), shape.n_samples);
            column[start..=end].fill(true);
        }
    }
}

/// Clamp an index into `[0, len - 1]`; `len` must be non-zero.
fn clip(index: i64, len: usize) -> usize {
    index.clamp(0, len as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_cells(mask: &BooleanMask) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for t in 0..mask.n_traces() {
            for s in 0..mask.n_samples() {
                if mask[(t, s)] {
                    cells.push((t, s));
                }
            }
        }
        cells
    }

    #[test]
    fn no_points_gives_empty_mask() {
        let m = rasterize_window(Shape::new(4, 4), &[], 2.0);
        assert!(!m.any());
    }

    #[test]
    fn single_point_marks_one_cell() {
        let m = rasterize_window(Shape::new(5, 10), &[Point::new(3, 8.2)], 2.0);
        assert_eq!(set_cells(&m), vec![(3, 4)]);
    }

    #[test]
    fn single_point_out_of_bounds_is_silently_empty() {
        let shape = Shape::new(5, 10);
        assert!(!rasterize_window(shape, &[Point::new(7, 2.0)], 2.0).any());
        assert!(!rasterize_window(shape, &[Point::new(-1, 2.0)], 2.0).any());
        assert!(!rasterize_window(shape, &[Point::new(2, 200.0)], 2.0).any());
    }

    #[test]
    fn rectangle_is_inclusive() {
        let m = rasterize_window(
            Shape::new(10, 10),
            &[Point::new(2, 10.0), Point::new(5, 40.0)],
            10.0,
        );
        let expected: Vec<(usize, usize)> = (2..=5)
            .flat_map(|t| (1..=4).map(move |s| (t, s)))
            .collect();
        assert_eq!(set_cells(&m), expected);
    }

    #[test]
    fn rectangle_corners_in_any_order_are_clipped() {
        let m = rasterize_window(
            Shape::new(6, 8),
            &[Point::new(9, 100.0), Point::new(4, -20.0)],
            4.0,
        );
        assert_eq!(m.count(), 2 * 8);
        assert!(m[(4, 0)] && m[(5, 7)]);
        assert!(!m[(3, 0)]);
    }

    #[test]
    fn triangle_fills_between_crossing_pairs() {
        // Apex at trace 4, base on trace 0 from 0 to 8 ms; dt = 1 ms.
        let tri = [Point::new(0, 0.0), Point::new(4, 4.0), Point::new(0, 8.0)];
        let m = rasterize_window(Shape::new(8, 12), &tri, 1.0);
        // Column 0: edges meet the scanline at 0 and 8.
        assert_eq!(m.trace(0).iter().filter(|&&c| c).count(), 9);
        // Column 2: crossings at 2 and 6.
        let col2: Vec<usize> = (0..12).filter(|&s| m[(2, s)]).collect();
        assert_eq!(col2, vec![2, 3, 4, 5, 6]);
        // Column 4: apex, both edges meet at 4.
        let col4: Vec<usize> = (0..12).filter(|&s| m[(4, s)]).collect();
        assert_eq!(col4, vec![4]);
        assert!(!m.trace(5).iter().any(|&c| c));
    }

    #[test]
    fn vertical_edges_do_not_contribute() {
        // Square with two vertical sides at traces 1 and 3.
        let sq = [
            Point::new(1, 2.0),
            Point::new(3, 2.0),
            Point::new(3, 6.0),
            Point::new(1, 6.0),
        ];
        let m = rasterize_window(Shape::new(5, 10), &sq, 1.0);
        for t in 1..=3 {
            let col: Vec<usize> = (0..10).filter(|&s| m[(t, s)]).collect();
            assert_eq!(col, vec![2, 3, 4, 5, 6], "trace {t}");
        }
        assert!(!m.trace(0).iter().any(|&c| c));
        assert!(!m.trace(4).iter().any(|&c| c));
    }

    #[test]
    fn odd_leftover_crossing_is_dropped() {
        // Column 2 meets the two upper edges at 5 ms and the bottom at 10 ms.
        let poly = [
            Point::new(0, 0.0),
            Point::new(2, 5.0),
            Point::new(4, 0.0),
            Point::new(4, 10.0),
            Point::new(0, 10.0),
        ];
        let m = rasterize_window(Shape::new(5, 12), &poly, 1.0);
        let col2: Vec<usize> = (0..12).filter(|&s| m[(2, s)]).collect();
        assert_eq!(col2, vec![5]);
    }

    #[test]
    fn extreme_trace_vertices_scan_only_grid_columns() {
        let poly = [
            Point::new(i32::MIN, 0.0),
            Point::new(i32::MAX, 0.0),
            Point::new(0, 10.0),
        ];
        let m = rasterize_window(Shape::new(5, 12), &poly, 1.0);
        assert!(m[(2, 0)] && m[(2, 5)]);
        assert!(!m.trace(2)[11]);
    }

    #[test]
    fn polygon_partly_outside_is_clipped() {
        let poly = [Point::new(-2, 0.0), Point::new(2, -10.0), Point::new(2, 50.0)];
        let m = rasterize_window(Shape::new(3, 5), &poly, 1.0);
        assert!(m.any());
        assert!(m.trace(2).iter().all(|&c| c));
    }
}
