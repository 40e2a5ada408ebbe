//! Destination ocean grid description.
//!
//! A layered, masked grid: `nk` z-levels with thicknesses `dz`, a bottom
//! index (`KMT`) per horizontal column, cell-center coordinates, and the
//! horizontal topology (cyclic longitude, optional tripolar fold).

use ndarray::{Array2, Array3};
use thiserror::Error;

use super::ocean_mask::OceanMask;
use super::topology::GridTopology;
use crate::types::GridShape;

/// Error type for grid construction and shape checks.
#[derive(Debug, Error)]
pub enum GridError {
    /// An array does not match the grid dimensions
    #[error("shape mismatch for '{name}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A column claims more wet levels than the grid has
    #[error("bottom index {value} at (j={j}, i={i}) exceeds {nk} levels")]
    BottomIndexOutOfRange {
        j: usize,
        i: usize,
        value: usize,
        nk: usize,
    },

    /// Layer thickness must be strictly positive
    #[error("layer {k} has non-positive thickness {value}")]
    NonPositiveThickness { k: usize, value: f64 },

    /// Grid with a zero-length dimension
    #[error("grid has an empty dimension: {0}")]
    Empty(GridShape),
}

/// Layered destination grid.
#[derive(Clone, Debug)]
pub struct OceanGrid {
    name: String,
    dz: Vec<f64>,
    bottom_index: Array2<usize>,
    lon: Array2<f64>,
    lat: Array2<f64>,
    topology: GridTopology,
}

impl OceanGrid {
    /// Create a grid from its components.
    ///
    /// # Arguments
    /// * `name` - Grid name (used in output metadata and log messages)
    /// * `dz` - Layer thicknesses, surface first (m)
    /// * `bottom_index` - Number of wet levels per column `[j, i]`; 0 is land
    /// * `lon`, `lat` - Cell-center coordinates `[j, i]` (degrees)
    /// * `tripolar` - Whether row 0 folds onto itself
    pub fn new(
        name: impl Into<String>,
        dz: Vec<f64>,
        bottom_index: Array2<usize>,
        lon: Array2<f64>,
        lat: Array2<f64>,
        tripolar: bool,
    ) -> Result<Self, GridError> {
        let (nj, ni) = bottom_index.dim();
        let nk = dz.len();
        let shape = GridShape::new(nk, nj, ni);

        if nk == 0 || nj == 0 || ni == 0 {
            return Err(GridError::Empty(shape));
        }

        if let Some((k, &value)) = dz.iter().enumerate().find(|&(_, &v)| !(v > 0.0)) {
            return Err(GridError::NonPositiveThickness { k, value });
        }

        for (coord_name, coord) in [("lon", &lon), ("lat", &lat)] {
            if coord.dim() != (nj, ni) {
                return Err(GridError::ShapeMismatch {
                    name: coord_name.to_string(),
                    expected: vec![nj, ni],
                    found: coord.shape().to_vec(),
                });
            }
        }

        if let Some(((j, i), &value)) = bottom_index.indexed_iter().find(|&(_, &v)| v > nk) {
            return Err(GridError::BottomIndexOutOfRange { j, i, value, nk });
        }

        Ok(Self {
            name: name.into(),
            dz,
            bottom_index,
            lon,
            lat,
            topology: GridTopology::new(nj, ni, tripolar),
        })
    }

    /// Create a grid on uniform global cell centers.
    ///
    /// Longitudes run eastward from 0; latitudes run southward from the
    /// fold row at `j = 0`. Intended for synthetic grids and tests.
    pub fn from_bottom_index(
        dz: Vec<f64>,
        bottom_index: Array2<usize>,
        tripolar: bool,
    ) -> Result<Self, GridError> {
        let (nj, ni) = bottom_index.dim();
        let dlon = 360.0 / ni.max(1) as f64;
        let dlat = 180.0 / nj.max(1) as f64;
        let lon = Array2::from_shape_fn((nj, ni), |(_, i)| (i as f64 + 0.5) * dlon);
        let lat = Array2::from_shape_fn((nj, ni), |(j, _)| 90.0 - (j as f64 + 0.5) * dlat);
        Self::new("synthetic", dz, bottom_index, lon, lat, tripolar)
    }

    /// Grid name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid dimensions.
    pub fn shape(&self) -> GridShape {
        let (nj, ni) = self.bottom_index.dim();
        GridShape::new(self.dz.len(), nj, ni)
    }

    /// Number of vertical levels.
    #[inline]
    pub fn nk(&self) -> usize {
        self.dz.len()
    }

    /// Layer thicknesses (m), surface first.
    #[inline]
    pub fn dz(&self) -> &[f64] {
        &self.dz
    }

    /// Bottom index (`KMT`) per column.
    #[inline]
    pub fn bottom_index(&self) -> &Array2<usize> {
        &self.bottom_index
    }

    /// Cell-center longitudes (degrees east).
    #[inline]
    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    /// Cell-center latitudes (degrees north).
    #[inline]
    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    /// Horizontal topology.
    #[inline]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    /// Layer interface depths (m, positive down), length `nk + 1`.
    pub fn depth_edges(&self) -> Vec<f64> {
        let mut edges = Vec::with_capacity(self.dz.len() + 1);
        let mut z = 0.0;
        edges.push(z);
        for &dz in &self.dz {
            z += dz;
            edges.push(z);
        }
        edges
    }

    /// Layer center depths (m, positive down), length `nk`.
    pub fn depth_centers(&self) -> Vec<f64> {
        self.depth_edges()
            .windows(2)
            .map(|w| 0.5 * (w[0] + w[1]))
            .collect()
    }

    /// Ocean mask for this grid.
    pub fn mask(&self) -> OceanMask {
        OceanMask::from_bottom_index(&self.bottom_index, self.nk())
    }

    /// Check that a 3D array lines up with this grid.
    pub fn check_shape(&self, name: &str, values: &Array3<f64>) -> Result<(), GridError> {
        let expected = self.shape();
        if values.dim() != expected.dim() {
            return Err(GridError::ShapeMismatch {
                name: name.to_string(),
                expected: vec![expected.nk, expected.nj, expected.ni],
                found: values.shape().to_vec(),
            });
        }
        Ok(())
    }
}
