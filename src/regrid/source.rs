//! Source climatology fields on regular lon/lat/depth grids.

use ndarray::Array3;

use super::RegridError;
use crate::fill::is_valid_f64;

/// A climatology field on its native grid.
///
/// Values are stored `[depth, lat, lon]` with NaN for missing data.
#[derive(Clone, Debug)]
pub struct SourceField {
    /// Variable name in the source file
    pub name: String,
    /// Units as given by the source
    pub units: String,
    /// Longitudes (degrees east), strictly increasing
    pub lon: Vec<f64>,
    /// Latitudes (degrees north), monotonic
    pub lat: Vec<f64>,
    /// Level center depths (m, positive down), strictly increasing
    pub depth: Vec<f64>,
    /// Data `[depth, lat, lon]`
    pub values: Array3<f64>,
}

impl SourceField {
    /// Create a source field, validating coordinate shapes.
    ///
    /// Fill values and non-finite entries in `values` become NaN.
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        lon: Vec<f64>,
        lat: Vec<f64>,
        depth: Vec<f64>,
        mut values: Array3<f64>,
    ) -> Result<Self, RegridError> {
        let name = name.into();

        for (coord, len) in [("lon", lon.len()), ("lat", lat.len()), ("depth", depth.len())] {
            if len == 0 {
                return Err(RegridError::EmptyCoordinate(format!("{name}.{coord}")));
            }
        }

        let expected = (depth.len(), lat.len(), lon.len());
        if values.dim() != expected {
            return Err(RegridError::ShapeMismatch {
                name,
                expected: vec![expected.0, expected.1, expected.2],
                found: values.shape().to_vec(),
            });
        }

        if !is_strictly_increasing(&lon) {
            return Err(RegridError::NonMonotonic(format!("{name}.lon")));
        }
        if !is_strictly_increasing(&depth) {
            return Err(RegridError::NonMonotonic(format!("{name}.depth")));
        }
        if !is_strictly_increasing(&lat) && !is_strictly_decreasing(&lat) {
            return Err(RegridError::NonMonotonic(format!("{name}.lat")));
        }

        values.mapv_inplace(|v| if is_valid_f64(v) { v } else { f64::NAN });

        Ok(Self {
            name,
            units: units.into(),
            lon,
            lat,
            depth,
            values,
        })
    }

    /// Number of source levels.
    pub fn n_levels(&self) -> usize {
        self.depth.len()
    }
}

fn is_strictly_increasing(v: &[f64]) -> bool {
    v.windows(2).all(|w| w[1] > w[0])
}

fn is_strictly_decreasing(v: &[f64]) -> bool {
    v.windows(2).all(|w| w[1] < w[0])
}
