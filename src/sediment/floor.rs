//! Minimum-floor application and iron sediment flux scaling.

use ndarray::{Array3, Zip};

use super::adjacency::LandAdjacency;
use crate::fill::is_valid_f64;
use crate::grid::OceanMask;

/// Raise land-adjacent values to at least `floor`.
///
/// Returns `max(value, floor)` at land-adjacent cells, `value` at other ocean
/// cells and `0` outside the ocean mask. Missing input values count as 0.
pub fn apply_land_adjacent_floor(
    values: &Array3<f64>,
    adjacency: &LandAdjacency,
    mask: &OceanMask,
    floor: f64,
) -> Array3<f64> {
    let mut out = Array3::zeros(values.raw_dim());
    Zip::from(&mut out)
        .and(values)
        .and(adjacency.as_array())
        .and(mask.as_array())
        .for_each(|o, &v, &adjacent, &wet| {
            if !wet {
                return;
            }
            let v = if is_valid_f64(v) { v } else { 0.0 };
            *o = if adjacent { v.max(floor) } else { v };
        });
    out
}

/// Iron sediment flux from a (floored) sediment fraction.
///
/// `flux = sedfrac * flux_per_sedfrac` in ocean cells, 0 elsewhere.
pub fn iron_sediment_flux(sedfrac: &Array3<f64>, mask: &OceanMask, flux_per_sedfrac: f64) -> Array3<f64> {
    let mut out = Array3::zeros(sedfrac.raw_dim());
    Zip::from(&mut out)
        .and(sedfrac)
        .and(mask.as_array())
        .for_each(|o, &s, &wet| {
            if wet && is_valid_f64(s) {
                *o = s * flux_per_sedfrac;
            }
        });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridTopology;
    use crate::sediment::land_adjacency;
    use ndarray::array;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_floor_only_where_adjacent() {
        // Single 2-level column: level 0 interior, level 1 on the bottom.
        let kmt = array![[2]];
        let mask = OceanMask::from_bottom_index(&kmt, 2);
        let adj = land_adjacency(&kmt, &GridTopology::new(1, 1, false), 2);

        let sedfrac = Array3::from_elem((2, 1, 1), 0.01);
        let out = apply_land_adjacent_floor(&sedfrac, &adj, &mask, 0.03);

        assert!((out[[0, 0, 0]] - 0.01).abs() < TOL);
        assert!((out[[1, 0, 0]] - 0.03).abs() < TOL);
    }

    #[test]
    fn test_floor_keeps_larger_values() {
        let kmt = array![[1]];
        let mask = OceanMask::from_bottom_index(&kmt, 1);
        let adj = land_adjacency(&kmt, &GridTopology::new(1, 1, false), 1);

        let out = apply_land_adjacent_floor(&array![[[0.5]]], &adj, &mask, 0.03);
        assert!((out[[0, 0, 0]] - 0.5).abs() < TOL);
    }

    #[test]
    fn test_land_forced_to_zero() {
        let kmt = array![[1, 0]];
        let mask = OceanMask::from_bottom_index(&kmt, 1);
        let adj = land_adjacency(&kmt, &GridTopology::new(1, 2, false), 1);

        let out = apply_land_adjacent_floor(&array![[[0.2, 0.7]]], &adj, &mask, 0.03);
        assert!((out[[0, 0, 0]] - 0.2).abs() < TOL);
        assert_eq!(out[[0, 0, 1]], 0.0);
    }

    #[test]
    fn test_iron_flux_scaling() {
        let kmt = array![[1, 0]];
        let mask = OceanMask::from_bottom_index(&kmt, 1);
        let flux = iron_sediment_flux(&array![[[0.5, 0.5]]], &mask, 4.0);
        assert!((flux[[0, 0, 0]] - 2.0).abs() < TOL);
        assert_eq!(flux[[0, 0, 1]], 0.0);
    }
}
