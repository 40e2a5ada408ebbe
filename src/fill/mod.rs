//! Missing-value fill for fields on the destination grid.
//!
//! Filling runs in two passes:
//! 1. **Lateral fill** (injected [`LateralFill`]) propagates valid values
//!    between neighboring ocean cells on the same level
//! 2. **Vertical fill** copies the nearest shallower value down each water
//!    column, resolving isolated deep holes the lateral pass cannot reach
//!
//! Cells still missing afterwards are reported with a warning naming the
//! field; processing continues.
//!
//! # Example
//!
//! ```
//! use bgc_inputs::fill::{Field3D, NeighborAverageFill, fill_missing};
//! use bgc_inputs::grid::OceanGrid;
//! use ndarray::{Array2, Array3};
//!
//! let grid = OceanGrid::from_bottom_index(vec![10.0, 10.0], Array2::from_elem((2, 2), 2), false)?;
//! let mut values = Array3::from_elem((2, 2, 2), 1.0);
//! values[[1, 0, 0]] = f64::NAN;
//!
//! let mut field = Field3D::new("no3", "mmol/m^3", values);
//! let report = fill_missing(&mut field, &grid.mask(), grid.topology(), &NeighborAverageFill::default());
//! assert_eq!(report.residual, 0);
//! # Ok::<(), bgc_inputs::grid::GridError>(())
//! ```

mod field;
mod lateral;
mod vertical;

pub use field::{FILL_VALUE_F64, Field3D, is_missing, is_valid_f64};
pub use lateral::{LateralFill, LateralFillStats, NeighborAverageFill};
pub use vertical::vertical_fill;

use log::{debug, warn};

use crate::grid::{GridTopology, OceanMask};

/// Number of residual cells listed in the warning message.
const MAX_LISTED_CELLS: usize = 5;

/// Bookkeeping for one field's fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReport {
    /// Field name
    pub field: String,
    /// Missing ocean cells before filling
    pub missing_before: usize,
    /// Missing ocean cells after the lateral pass
    pub missing_after_lateral: usize,
    /// Missing ocean cells after the vertical pass
    pub residual: usize,
}

impl FillReport {
    /// Whether every ocean cell has a value.
    pub fn is_complete(&self) -> bool {
        self.residual == 0
    }
}

/// Fill missing ocean cells of `field`: lateral pass, then vertical pass.
///
/// Residual missing values are not an error; they are logged at warning
/// level with the field name and the first few offending cells.
pub fn fill_missing(
    field: &mut Field3D,
    mask: &OceanMask,
    topology: &GridTopology,
    lateral: &dyn LateralFill,
) -> FillReport {
    let missing_before = field.missing_count(mask);

    if missing_before > 0 {
        let stats = lateral.fill(field.values_mut(), mask, topology);
        debug!(
            "{}: {} fill set {} cells in at most {} sweeps",
            field.name(),
            lateral.name(),
            stats.filled,
            stats.max_sweeps
        );
    }
    let missing_after_lateral = field.missing_count(mask);

    let residual = vertical_fill(field.values_mut(), mask);

    if residual > 0 {
        let listed: Vec<String> = field
            .missing_cells(mask)
            .into_iter()
            .take(MAX_LISTED_CELLS)
            .map(|c| c.to_string())
            .collect();
        warn!(
            "{}: {} ocean cells still missing after fill (first: {})",
            field.name(),
            residual,
            listed.join(", ")
        );
    }

    FillReport {
        field: field.name().to_string(),
        missing_before,
        missing_after_lateral,
        residual,
    }
}
