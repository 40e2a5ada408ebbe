//! Regridding of source climatologies onto the destination grid.
//!
//! Regridding is an injected capability ([`Regridder`]) so the fill and
//! adjacency code can be exercised without any interpolation machinery.
//! [`StandardRegridder`] is the default:
//!
//! 1. **Horizontal**: bilinear interpolation of every source level onto the
//!    destination cell centers ([`BilinearHorizontal`]), periodic in longitude
//!    and renormalized over valid corners
//! 2. **Vertical**: thickness-weighted conservative remap of each column onto
//!    the destination layers ([`ConservativeVertical`]), renormalized over
//!    valid source layers
//! 3. Cells outside the ocean mask are set to NaN
//!
//! # Example
//!
//! ```
//! use bgc_inputs::grid::OceanGrid;
//! use bgc_inputs::regrid::{Regridder, SourceField, StandardRegridder};
//! use ndarray::{Array2, Array3};
//!
//! let grid = OceanGrid::from_bottom_index(vec![10.0, 20.0], Array2::from_elem((2, 4), 2), false)?;
//! let source = SourceField::new(
//!     "t_an",
//!     "degC",
//!     vec![0.0, 90.0, 180.0, 270.0],
//!     vec![-45.0, 45.0],
//!     vec![5.0, 20.0],
//!     Array3::from_elem((2, 2, 4), 4.0),
//! )?;
//!
//! let values = StandardRegridder.regrid(&source, &grid)?;
//! assert_eq!(values.dim(), (2, 2, 4));
//! assert!((values[[1, 0, 0]] - 4.0).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod horizontal;
mod source;
mod vertical;

pub use horizontal::{BilinearHorizontal, BilinearStencil};
pub use source::SourceField;
pub use vertical::{ConservativeVertical, layer_edges_from_centers};

use log::debug;
use ndarray::{Array3, Axis};
use thiserror::Error;

use crate::grid::OceanGrid;

/// Error type for regridding.
#[derive(Debug, Error)]
pub enum RegridError {
    /// Data array does not match its coordinates
    #[error("shape mismatch for '{name}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// Coordinate axis with no entries
    #[error("empty coordinate: {0}")]
    EmptyCoordinate(String),

    /// Coordinate axis not strictly monotonic
    #[error("coordinate is not strictly monotonic: {0}")]
    NonMonotonic(String),
}

/// Capability that maps a source field onto the destination grid.
pub trait Regridder {
    /// Regrid `source` onto `grid`, returning values `[k, j, i]`.
    ///
    /// Missing values are NaN; cells outside the ocean mask must be NaN.
    fn regrid(&self, source: &SourceField, grid: &OceanGrid) -> Result<Array3<f64>, RegridError>;

    /// Name of this regridder for logging.
    fn name(&self) -> &'static str;
}

/// Bilinear horizontal then conservative vertical regridding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRegridder;

impl Regridder for StandardRegridder {
    fn regrid(&self, source: &SourceField, grid: &OceanGrid) -> Result<Array3<f64>, RegridError> {
        let shape = grid.shape();
        let horizontal = BilinearHorizontal::new(&source.lon, &source.lat, grid.lon(), grid.lat());
        let vertical = ConservativeVertical::from_centers(&source.depth, &grid.depth_edges())?;

        // Horizontal pass: [source level, j, i]
        let mut on_columns = Array3::from_elem((source.n_levels(), shape.nj, shape.ni), f64::NAN);
        for (src_level, mut dst_level) in source
            .values
            .axis_iter(Axis(0))
            .zip(on_columns.axis_iter_mut(Axis(0)))
        {
            dst_level.assign(&horizontal.apply(&src_level));
        }

        // Vertical pass per wet column
        let mut out = Array3::from_elem(shape.dim(), f64::NAN);
        let mut column = vec![0.0; source.n_levels()];
        let mut remapped = vec![0.0; shape.nk];

        for ((j, i), &depth) in grid.bottom_index().indexed_iter() {
            if depth == 0 {
                continue;
            }
            for (c, &v) in column.iter_mut().zip(on_columns.slice(ndarray::s![.., j, i])) {
                *c = v;
            }
            vertical.remap_column(&column, &mut remapped);
            for (k, &v) in remapped.iter().enumerate().take(depth) {
                out[[k, j, i]] = v;
            }
        }

        debug!(
            "regridded '{}' from {}x{}x{} onto {} grid {}",
            source.name,
            source.n_levels(),
            source.lat.len(),
            source.lon.len(),
            grid.name(),
            shape
        );

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "bilinear+conservative"
    }
}
