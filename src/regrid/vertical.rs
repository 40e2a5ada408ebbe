//! Thickness-weighted conservative vertical remapping.
//!
//! Source levels are given by their center depths; layer interfaces are
//! reconstructed halfway between centers, with the top interface at the
//! surface and the bottom interface mirrored from the last half-spacing.
//! Each destination layer is the overlap-weighted mean of the valid source
//! layers it intersects, renormalized by the valid overlap.

use super::RegridError;
use crate::fill::is_valid_f64;

/// Layer interfaces (m, positive down) reconstructed from level centers.
///
/// `centers` must be non-empty and strictly increasing.
pub fn layer_edges_from_centers(centers: &[f64]) -> Vec<f64> {
    let n = centers.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(0.0_f64.min(centers[0]));
    for w in centers.windows(2) {
        edges.push(0.5 * (w[0] + w[1]));
    }
    let last = centers[n - 1];
    let below = last + (last - edges[n - 1]);
    edges.push(below.max(last));
    edges
}

/// Overlap weights from source layers onto destination layers.
#[derive(Clone, Debug)]
pub struct ConservativeVertical {
    /// For each destination layer, `(source layer, overlap thickness)`
    overlaps: Vec<Vec<(usize, f64)>>,
    n_source: usize,
}

impl ConservativeVertical {
    /// Build the remap between two sets of layer interfaces.
    ///
    /// Both edge lists must be strictly increasing with at least two entries.
    pub fn new(src_edges: &[f64], dst_edges: &[f64]) -> Result<Self, RegridError> {
        for (name, edges) in [("source layer edges", src_edges), ("destination layer edges", dst_edges)] {
            if edges.len() < 2 {
                return Err(RegridError::EmptyCoordinate(name.to_string()));
            }
            if edges.windows(2).any(|w| !(w[1] > w[0])) {
                return Err(RegridError::NonMonotonic(name.to_string()));
            }
        }

        let overlaps = dst_edges
            .windows(2)
            .map(|d| {
                src_edges
                    .windows(2)
                    .enumerate()
                    .filter_map(|(s, e)| {
                        let overlap = d[1].min(e[1]) - d[0].max(e[0]);
                        (overlap > 0.0).then_some((s, overlap))
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            overlaps,
            n_source: src_edges.len() - 1,
        })
    }

    /// Build the remap from source level centers onto destination edges.
    ///
    /// A single source level is treated as vertically uniform and spans
    /// every destination layer.
    pub fn from_centers(src_centers: &[f64], dst_edges: &[f64]) -> Result<Self, RegridError> {
        if src_centers.len() == 1 {
            let top = dst_edges.first().copied().unwrap_or(0.0);
            let bottom = dst_edges.last().copied().unwrap_or(0.0);
            return Self::new(&[top, bottom.max(top + 1.0)], dst_edges);
        }
        Self::new(&layer_edges_from_centers(src_centers), dst_edges)
    }

    /// Number of destination layers.
    pub fn n_layers(&self) -> usize {
        self.overlaps.len()
    }

    /// Number of source layers.
    pub fn n_source(&self) -> usize {
        self.n_source
    }

    /// Remap one column of source values.
    ///
    /// Destination layers with no valid overlapping source layer are NaN.
    pub fn remap_column(&self, column: &[f64], out: &mut [f64]) {
        debug_assert_eq!(column.len(), self.n_source);
        debug_assert_eq!(out.len(), self.overlaps.len());

        for (o, layer) in out.iter_mut().zip(&self.overlaps) {
            let (sum, thickness) = layer
                .iter()
                .filter(|&&(s, _)| is_valid_f64(column[s]))
                .fold((0.0, 0.0), |(sum, th), &(s, w)| (sum + w * column[s], th + w));
            *o = if thickness > 0.0 { sum / thickness } else { f64::NAN };
        }
    }
}
