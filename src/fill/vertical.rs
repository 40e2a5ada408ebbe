//! Vertical nearest-above fill.
//!
//! One surface-to-bottom sweep: a missing ocean cell at level `k` takes the
//! (possibly just filled) value at level `k - 1`. Gaps that reach the surface
//! cannot be resolved this way and are left missing.

use ndarray::{Array3, Axis};

use super::field::is_missing;
use crate::grid::OceanMask;

/// Fill missing ocean cells from the level above.
///
/// Returns the number of ocean cells still missing afterwards. Running the
/// fill a second time changes nothing.
pub fn vertical_fill(values: &mut Array3<f64>, mask: &OceanMask) -> usize {
    let (nk, nj, ni) = values.dim();
    debug_assert_eq!(mask.shape().dim(), (nk, nj, ni));

    for k in 1..nk {
        let (above, mut below) = values.view_mut().split_at(Axis(0), k);
        let above = above.index_axis(Axis(0), k - 1);
        let mut level = below.index_axis_mut(Axis(0), 0);

        for ((j, i), v) in level.indexed_iter_mut() {
            if mask.is_wet(k, j, i) && is_missing(*v) {
                *v = above[[j, i]];
            }
        }
    }

    values
        .indexed_iter()
        .filter(|&((k, j, i), &v)| mask.is_wet(k, j, i) && is_missing(v))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    fn column_mask(nk: usize, depth: usize) -> OceanMask {
        OceanMask::from_bottom_index(&Array2::from_elem((1, 1), depth), nk)
    }

    #[test]
    fn test_fills_deep_hole() {
        let mask = column_mask(4, 4);
        let mut values = Array3::from_shape_vec((4, 1, 1), vec![1.0, f64::NAN, f64::NAN, 4.0]).unwrap();
        let residual = vertical_fill(&mut values, &mask);
        assert_eq!(residual, 0);
        assert_eq!(values.iter().copied().collect::<Vec<_>>(), vec![1.0, 1.0, 1.0, 4.0]);
    }

    #[test]
    fn test_surface_gap_remains() {
        let mask = column_mask(3, 3);
        let mut values = Array3::from_shape_vec((3, 1, 1), vec![f64::NAN, f64::NAN, 3.0]).unwrap();
        let residual = vertical_fill(&mut values, &mask);
        assert_eq!(residual, 2);
        assert_eq!(values[[2, 0, 0]], 3.0);
    }

    #[test]
    fn test_below_bottom_untouched() {
        let mask = column_mask(3, 1);
        let mut values = Array3::from_shape_vec((3, 1, 1), vec![5.0, f64::NAN, f64::NAN]).unwrap();
        let residual = vertical_fill(&mut values, &mask);
        assert_eq!(residual, 0);
        assert!(values[[1, 0, 0]].is_nan());
        assert!(values[[2, 0, 0]].is_nan());
    }

    #[test]
    fn test_idempotent() {
        let kmt = array![[3, 2], [0, 3]];
        let mask = OceanMask::from_bottom_index(&kmt, 3);
        let mut values = Array3::from_shape_vec(
            (3, 2, 2),
            vec![
                1.0, f64::NAN, f64::NAN, 4.0, //
                f64::NAN, 2.0, f64::NAN, f64::NAN, //
                f64::NAN, f64::NAN, f64::NAN, 7.0,
            ],
        )
        .unwrap();

        let first = vertical_fill(&mut values, &mask);
        let once = values.clone();
        let second = vertical_fill(&mut values, &mask);

        assert_eq!(first, second);
        for (a, b) in once.iter().zip(values.iter()) {
            assert!(a == b || (a.is_nan() && b.is_nan()));
        }
    }
}
