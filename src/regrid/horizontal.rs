//! Bilinear horizontal interpolation from a regular lon/lat source.
//!
//! Source longitudes are treated as a global periodic axis: destination
//! longitudes are shifted into `[lon[0], lon[0] + 360)` and the last source
//! column brackets against the first. Latitudes are clamped at the ends.
//!
//! Corner weights are computed once per destination cell and reused for
//! every source level. At apply time the weights are renormalized over the
//! corners that hold valid data.

use ndarray::{Array2, ArrayView2};

use crate::fill::is_valid_f64;

/// Bilinear stencil for one destination point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilinearStencil {
    /// Source `(j, i)` of the four corners
    pub corners: [(usize, usize); 4],
    /// Bilinear weight of each corner (sums to 1)
    pub weights: [f64; 4],
}

impl BilinearStencil {
    /// Interpolate one source level, renormalizing over valid corners.
    ///
    /// Returns NaN when no corner with non-zero weight is valid.
    #[inline]
    pub fn apply(&self, level: &ArrayView2<f64>) -> f64 {
        let mut sum = 0.0;
        let mut weight = 0.0;
        for (&(j, i), &w) in self.corners.iter().zip(&self.weights) {
            let v = level[[j, i]];
            if w > 0.0 && is_valid_f64(v) {
                sum += w * v;
                weight += w;
            }
        }
        if weight > 0.0 { sum / weight } else { f64::NAN }
    }
}

/// Precomputed bilinear stencils for a destination grid `[j, i]`.
#[derive(Clone, Debug)]
pub struct BilinearHorizontal {
    stencils: Array2<BilinearStencil>,
}

impl BilinearHorizontal {
    /// Compute stencils mapping the source axes onto destination centers.
    ///
    /// `src_lon` must be strictly increasing; `src_lat` monotonic.
    pub fn new(src_lon: &[f64], src_lat: &[f64], dst_lon: &Array2<f64>, dst_lat: &Array2<f64>) -> Self {
        let stencils = Array2::from_shape_fn(dst_lon.dim(), |(j, i)| {
            let (i0, i1, fx) = periodic_bracket(src_lon, dst_lon[[j, i]]);
            let (j0, j1, fy) = find_bracket(src_lat, dst_lat[[j, i]]);
            BilinearStencil {
                corners: [(j0, i0), (j0, i1), (j1, i0), (j1, i1)],
                weights: [
                    (1.0 - fx) * (1.0 - fy),
                    fx * (1.0 - fy),
                    (1.0 - fx) * fy,
                    fx * fy,
                ],
            }
        });
        Self { stencils }
    }

    /// Destination horizontal shape `(nj, ni)`.
    pub fn dim(&self) -> (usize, usize) {
        self.stencils.dim()
    }

    /// Stencil for destination column `(j, i)`.
    pub fn stencil(&self, j: usize, i: usize) -> &BilinearStencil {
        &self.stencils[[j, i]]
    }

    /// Interpolate one source level onto the destination grid.
    pub fn apply(&self, level: &ArrayView2<f64>) -> Array2<f64> {
        self.stencils.map(|s| s.apply(level))
    }
}

/// Bracket a longitude on a periodic, strictly increasing axis.
///
/// Returns `(i0, i1, fx)` with the value at `lon[i0] + fx * span`.
fn periodic_bracket(lon: &[f64], value: f64) -> (usize, usize, f64) {
    let n = lon.len();
    if n == 1 {
        return (0, 0, 0.0);
    }

    let x = lon[0] + (value - lon[0]).rem_euclid(360.0);
    // Largest i0 with lon[i0] <= x; x >= lon[0] so i0 exists.
    let i0 = lon.partition_point(|&l| l <= x).saturating_sub(1);

    let (i1, span) = if i0 == n - 1 {
        (0, lon[0] + 360.0 - lon[n - 1])
    } else {
        (i0 + 1, lon[i0 + 1] - lon[i0])
    };

    let fx = if span > 0.0 { ((x - lon[i0]) / span).clamp(0.0, 1.0) } else { 0.0 };
    (i0, i1, fx)
}

/// Find bracket indices and interpolation factor on a monotonic axis.
///
/// Values outside the axis clamp to the nearest end.
fn find_bracket(coords: &[f64], value: f64) -> (usize, usize, f64) {
    let n = coords.len();
    if n == 1 {
        return (0, 0, 0.0);
    }

    let ascending = coords[1] > coords[0];

    for i in 0..n - 1 {
        let (c0, c1) = (coords[i], coords[i + 1]);
        let inside = if ascending {
            c0 <= value && value <= c1
        } else {
            c1 <= value && value <= c0
        };
        if inside {
            let f = (value - c0) / (c1 - c0);
            return (i, i + 1, f.clamp(0.0, 1.0));
        }
    }

    // Outside the axis: clamp to the nearer end.
    if (value - coords[0]).abs() <= (value - coords[n - 1]).abs() {
        (0, 0, 0.0)
    } else {
        (n - 1, n - 1, 0.0)
    }
}
