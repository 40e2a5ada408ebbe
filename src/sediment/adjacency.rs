//! Land-adjacency classification of ocean cells.
//!
//! A wet cell `(k, j, i)` with column depth `d = bottom_index[j, i]` is
//! land-adjacent when either
//! - some horizontal neighbor has depth `<= d` and `k` is at or below the
//!   shallowest such neighbor's depth (a side wall at this level), or
//! - `k == d - 1`, the bottom-most wet cell, which sits on the sediment.
//!
//! Neighbors follow the grid topology: cyclic longitude, tripolar fold on
//! row 0, no neighbor beyond the other row edges.

use ndarray::{Array2, Array3};

use crate::grid::{GridTopology, OceanGrid, neighbor_offsets};

/// Land-adjacency flags `[k, j, i]`; false at every land cell.
#[derive(Clone, Debug)]
pub struct LandAdjacency {
    adjacent: Array3<bool>,
}

impl LandAdjacency {
    /// Classify every wet cell of `grid`.
    pub fn for_grid(grid: &OceanGrid) -> Self {
        land_adjacency(grid.bottom_index(), grid.topology(), grid.nk())
    }

    /// Check if a cell is land-adjacent.
    #[inline]
    pub fn is_adjacent(&self, k: usize, j: usize, i: usize) -> bool {
        self.adjacent[[k, j, i]]
    }

    /// Underlying boolean array `[k, j, i]`.
    #[inline]
    pub fn as_array(&self) -> &Array3<bool> {
        &self.adjacent
    }

    /// Number of land-adjacent cells.
    pub fn count(&self) -> usize {
        self.adjacent.iter().filter(|&&a| a).count()
    }
}

/// Classify wet cells of a `nk`-level grid as land-adjacent.
///
/// `bottom_index` must have the `(nj, ni)` shape of `topology`; depths
/// beyond `nk` are clipped.
pub fn land_adjacency(
    bottom_index: &Array2<usize>,
    topology: &GridTopology,
    nk: usize,
) -> LandAdjacency {
    let (nj, ni) = bottom_index.dim();
    debug_assert_eq!((nj, ni), (topology.nj(), topology.ni()));

    let maps = neighbor_offsets(topology);
    let mut adjacent = Array3::from_elem((nk, nj, ni), false);

    for ((j, i), &depth) in bottom_index.indexed_iter() {
        if depth == 0 {
            continue;
        }

        // Shallowest neighbor that does not exceed this column's depth.
        let wall_top = maps
            .iter()
            .filter_map(|m| m.apply(j, i))
            .map(|(jn, in_)| bottom_index[[jn, in_]])
            .filter(|&nd| nd <= depth)
            .min();

        for k in 0..depth.min(nk) {
            let on_bottom = k + 1 == depth;
            let beside_wall = wall_top.is_some_and(|top| k >= top);
            adjacent[[k, j, i]] = on_bottom || beside_wall;
        }
    }

    LandAdjacency { adjacent }
}
