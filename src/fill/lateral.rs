//! Horizontal (same-level) lateral fill.
//!
//! The fill is an injected capability: anything implementing [`LateralFill`]
//! can be handed to the pipeline. [`NeighborAverageFill`] is the default,
//! sweeping each level and replacing missing ocean cells that touch valid
//! ocean cells with the mean of those neighbors until nothing changes.

use ndarray::{Array3, Axis};

use super::field::is_missing;
use crate::grid::{GridTopology, OceanMask, neighbor_offsets};

/// Summary of one lateral fill call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LateralFillStats {
    /// Number of cells that received a value
    pub filled: usize,
    /// Largest number of sweeps used on any level
    pub max_sweeps: usize,
}

/// Capability that fills missing ocean values from same-level neighbors.
pub trait LateralFill {
    /// Fill missing ocean cells of `values` in place.
    ///
    /// Only cells where `mask` is true are read or written; neighbor
    /// relations follow `topology` (cyclic longitude, tripolar fold).
    fn fill(
        &self,
        values: &mut Array3<f64>,
        mask: &OceanMask,
        topology: &GridTopology,
    ) -> LateralFillStats;

    /// Name of this fill for logging.
    fn name(&self) -> &'static str;
}

/// Iterative 8-neighbor averaging fill.
#[derive(Debug, Clone, Copy)]
pub struct NeighborAverageFill {
    /// Maximum number of sweeps per level
    pub max_sweeps: usize,
}

impl Default for NeighborAverageFill {
    fn default() -> Self {
        Self { max_sweeps: 1000 }
    }
}

impl NeighborAverageFill {
    /// Create a fill with a sweep limit per level.
    pub fn new(max_sweeps: usize) -> Self {
        Self { max_sweeps }
    }
}

impl LateralFill for NeighborAverageFill {
    fn fill(
        &self,
        values: &mut Array3<f64>,
        mask: &OceanMask,
        topology: &GridTopology,
    ) -> LateralFillStats {
        let maps = neighbor_offsets(topology);
        let mut stats = LateralFillStats::default();
        let mut updates: Vec<((usize, usize), f64)> = Vec::new();

        for (k, mut level) in values.axis_iter_mut(Axis(0)).enumerate() {
            let mut sweeps = 0;

            while sweeps < self.max_sweeps {
                updates.clear();

                for ((j, i), &v) in level.indexed_iter() {
                    if !mask.is_wet(k, j, i) || !is_missing(v) {
                        continue;
                    }

                    let (sum, count) = maps
                        .iter()
                        .filter_map(|m| m.apply(j, i))
                        .filter(|&(jn, in_)| mask.is_wet(k, jn, in_))
                        .map(|(jn, in_)| level[[jn, in_]])
                        .filter(|&nv| !is_missing(nv))
                        .fold((0.0, 0usize), |(s, n), nv| (s + nv, n + 1));

                    if count > 0 {
                        updates.push(((j, i), sum / count as f64));
                    }
                }

                if updates.is_empty() {
                    break;
                }

                for &((j, i), v) in &updates {
                    level[[j, i]] = v;
                }
                stats.filled += updates.len();
                sweeps += 1;
            }

            stats.max_sweeps = stats.max_sweeps.max(sweeps);
        }

        stats
    }

    fn name(&self) -> &'static str {
        "neighbor-average"
    }
}
