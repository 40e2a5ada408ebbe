//! Sediment fraction and iron sediment flux forcing.
//!
//! The sediment fraction (`sedfrac`) is the fraction of a cell's volume that
//! lies on the ocean floor. Cells next to land get a minimum `sedfrac` so
//! that sediment-sourced fluxes are not lost where the precomputed fraction
//! under-resolves narrow shelves.
//!
//! # Example
//!
//! ```
//! use bgc_inputs::grid::OceanGrid;
//! use bgc_inputs::sediment::{SedimentConfig, SedimentForcing};
//! use ndarray::{Array2, Array3};
//!
//! let grid = OceanGrid::from_bottom_index(vec![10.0, 10.0], Array2::from_elem((2, 2), 2), false)?;
//! let sedfrac = Array3::from_elem((2, 2, 2), 0.01);
//!
//! let config = SedimentConfig::default().with_land_adj_sedfrac_min(0.03);
//! let forcing = SedimentForcing::compute(&grid, &sedfrac, &config)?;
//!
//! // Bottom-most cells are always land-adjacent.
//! assert_eq!(forcing.sedfrac[[1, 0, 0]], 0.03);
//! # Ok::<(), bgc_inputs::grid::GridError>(())
//! ```

mod adjacency;
mod floor;

pub use adjacency::{LandAdjacency, land_adjacency};
pub use floor::{apply_land_adjacent_floor, iron_sediment_flux};

use log::info;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::grid::{GridError, OceanGrid};

/// Parameters for sediment forcing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SedimentConfig {
    /// Minimum sediment fraction at land-adjacent cells
    pub land_adj_sedfrac_min: f64,
    /// Iron flux per unit sediment fraction (model flux units)
    pub iron_flux_per_sedfrac: f64,
}

impl Default for SedimentConfig {
    fn default() -> Self {
        Self {
            land_adj_sedfrac_min: 0.03,
            iron_flux_per_sedfrac: 1.0,
        }
    }
}

impl SedimentConfig {
    /// Set the land-adjacent sediment fraction floor.
    pub fn with_land_adj_sedfrac_min(mut self, value: f64) -> Self {
        self.land_adj_sedfrac_min = value;
        self
    }

    /// Set the iron flux scale.
    pub fn with_iron_flux_per_sedfrac(mut self, value: f64) -> Self {
        self.iron_flux_per_sedfrac = value;
        self
    }
}

/// Sediment forcing on the destination grid.
#[derive(Clone, Debug)]
pub struct SedimentForcing {
    /// Sediment fraction after the land-adjacent floor `[k, j, i]`
    pub sedfrac: Array3<f64>,
    /// Iron sediment flux `[k, j, i]`
    pub iron_flux: Array3<f64>,
    /// Land-adjacency classification used for the floor
    pub adjacency: LandAdjacency,
}

impl SedimentForcing {
    /// Build sediment forcing from a precomputed sediment fraction.
    ///
    /// Fails if `sedfrac` does not have the grid's `(nk, nj, ni)` shape.
    pub fn compute(
        grid: &OceanGrid,
        sedfrac: &Array3<f64>,
        config: &SedimentConfig,
    ) -> Result<Self, GridError> {
        grid.check_shape("sedfrac", sedfrac)?;

        let mask = grid.mask();
        let adjacency = LandAdjacency::for_grid(grid);
        let floored = apply_land_adjacent_floor(sedfrac, &adjacency, &mask, config.land_adj_sedfrac_min);
        let iron_flux = iron_sediment_flux(&floored, &mask, config.iron_flux_per_sedfrac);

        info!(
            "sediment forcing on {}: {} of {} ocean cells land-adjacent (floor {})",
            grid.name(),
            adjacency.count(),
            mask.wet_count(),
            config.land_adj_sedfrac_min
        );

        Ok(Self {
            sedfrac: floored,
            iron_flux,
            adjacency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_shape_mismatch_is_fatal() {
        let grid = OceanGrid::from_bottom_index(vec![10.0, 10.0], Array2::from_elem((2, 3), 2), false).unwrap();
        let sedfrac = Array3::zeros((2, 3, 2));
        let result = SedimentForcing::compute(&grid, &sedfrac, &SedimentConfig::default());
        assert!(matches!(result, Err(GridError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_flux_follows_floored_sedfrac() {
        let grid = OceanGrid::from_bottom_index(vec![10.0], Array2::from_elem((1, 2), 1), false).unwrap();
        let sedfrac = Array3::from_elem((1, 1, 2), 0.0);
        let config = SedimentConfig::default()
            .with_land_adj_sedfrac_min(0.05)
            .with_iron_flux_per_sedfrac(2.0);

        let forcing = SedimentForcing::compute(&grid, &sedfrac, &config).unwrap();
        assert!(forcing.iron_flux.iter().all(|&f| (f - 0.1).abs() < 1e-12));
        assert_eq!(forcing.adjacency.count(), 2);
    }
}
