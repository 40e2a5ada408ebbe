//! Destination grid representation.
//!
//! Provides the pieces every field on the target ocean grid is aligned with:
//! - Horizontal topology with cyclic longitude and tripolar fold
//! - Layered grid description (thicknesses, bottom index, coordinates)
//! - 3D ocean-bottom mask

mod ocean_grid;
mod ocean_mask;
mod topology;

pub use ocean_grid::{GridError, OceanGrid};
pub use ocean_mask::{MaskStatistics, OceanMask};
pub use topology::{Direction, GridTopology, NeighborMap, neighbor_offsets};
