use crate::data::model::{BooleanMask, SeismicGrid};

/// Root-mean-square amplitude over the cells selected by `mask`.
///
/// Squares are accumulated in `f64`. Returns `0.0` when nothing is
/// selected.
pub fn rms(grid: &SeismicGrid, mask: &BooleanMask) -> f32 {
    debug_assert_eq!(grid.shape(), mask.shape());
    let (sum, count) = grid
        .as_slice()
        .iter()
        .zip(mask.as_slice())
        .filter(|&(_, &selected)| selected)
        .fold((0.0f64, 0usize), |(sum, count), (&v, _)| {
            let v = f64::from(v);
            (sum + v * v, count + 1)
        });
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).sqrt() as f32
}
