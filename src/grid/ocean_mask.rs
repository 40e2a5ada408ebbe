//! Ocean-bottom mask derived from the bottom index.
//!
//! A cell `(k, j, i)` is ocean iff `k < bottom_index[j, i]`, so each water
//! column is wet from the surface down to its bottom level and dry below.

use ndarray::{Array2, Array3};

use crate::types::GridShape;

/// 3D ocean mask for a layered destination grid.
#[derive(Clone, Debug)]
pub struct OceanMask {
    wet: Array3<bool>,
}

impl OceanMask {
    /// Build the mask for `nk` levels from a 2D bottom index.
    ///
    /// Bottom indices larger than `nk` are clipped to the full column.
    pub fn from_bottom_index(bottom_index: &Array2<usize>, nk: usize) -> Self {
        let (nj, ni) = bottom_index.dim();
        let wet = Array3::from_shape_fn((nk, nj, ni), |(k, j, i)| k < bottom_index[[j, i]]);
        Self { wet }
    }

    /// Grid shape covered by this mask.
    pub fn shape(&self) -> GridShape {
        self.wet.dim().into()
    }

    /// Check if a cell is ocean.
    #[inline]
    pub fn is_wet(&self, k: usize, j: usize, i: usize) -> bool {
        self.wet[[k, j, i]]
    }

    /// Underlying boolean array `[k, j, i]`.
    #[inline]
    pub fn as_array(&self) -> &Array3<bool> {
        &self.wet
    }

    /// Number of wet cells.
    pub fn wet_count(&self) -> usize {
        self.wet.iter().filter(|&&w| w).count()
    }

    /// Number of dry cells.
    pub fn dry_count(&self) -> usize {
        self.wet.len() - self.wet_count()
    }

    /// Number of columns that are dry at every level.
    pub fn land_column_count(&self) -> usize {
        let (nk, nj, ni) = self.wet.dim();
        if nk == 0 {
            return nj * ni;
        }
        self.wet
            .index_axis(ndarray::Axis(0), 0)
            .iter()
            .filter(|&&w| !w)
            .count()
    }

    /// Get statistics about the mask.
    pub fn statistics(&self) -> MaskStatistics {
        let wet_cells = self.wet_count();
        MaskStatistics {
            shape: self.shape(),
            wet_cells,
            dry_cells: self.wet.len() - wet_cells,
            land_columns: self.land_column_count(),
        }
    }
}

/// Statistics about an ocean mask.
#[derive(Debug, Clone)]
pub struct MaskStatistics {
    /// Grid shape
    pub shape: GridShape,
    /// Number of wet (ocean) cells
    pub wet_cells: usize,
    /// Number of dry cells
    pub dry_cells: usize,
    /// Number of all-land columns
    pub land_columns: usize,
}

impl std::fmt::Display for MaskStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.shape.n_cells().max(1) as f64;
        writeln!(f, "Ocean Mask Statistics:")?;
        writeln!(f, "  Grid: {}", self.shape)?;
        writeln!(
            f,
            "  Wet cells: {} ({:.1}%)",
            self.wet_cells,
            100.0 * self.wet_cells as f64 / total
        )?;
        writeln!(
            f,
            "  Dry cells: {} ({:.1}%)",
            self.dry_cells,
            100.0 * self.dry_cells as f64 / total
        )?;
        write!(f, "  Land columns: {}", self.land_columns)
    }
}
