//! Gridded 3D fields with missing values.
//!
//! Missing values are stored as NaN. Values read from files that carry CF
//! fill values (or anything with magnitude above 1e30) are normalized to NaN
//! with [`Field3D::normalize_missing`].

use ndarray::Array3;

use crate::grid::OceanMask;
use crate::types::{Cell, GridShape};

/// Fill value for missing data on output (CF-conventions default for f64).
pub const FILL_VALUE_F64: f64 = 9.96920996838687e+36;

/// Check if a value is valid (finite and not a fill value).
#[inline]
pub fn is_valid_f64(v: f64) -> bool {
    v.is_finite() && v.abs() < 1.0e+30
}

/// Check if a value is missing.
#[inline]
pub fn is_missing(v: f64) -> bool {
    !is_valid_f64(v)
}

/// A named 3D field `[k, j, i]` aligned with the destination grid.
#[derive(Clone, Debug)]
pub struct Field3D {
    name: String,
    units: String,
    long_name: Option<String>,
    values: Array3<f64>,
}

impl Field3D {
    /// Create a new field.
    pub fn new(name: impl Into<String>, units: impl Into<String>, values: Array3<f64>) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            long_name: None,
            values,
        }
    }

    /// Set the long name attribute.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn shape(&self) -> GridShape {
        self.values.dim().into()
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Array3<f64> {
        &mut self.values
    }

    pub fn into_values(self) -> Array3<f64> {
        self.values
    }

    /// Replace fill values and non-finite entries with NaN.
    pub fn normalize_missing(&mut self) {
        self.values.mapv_inplace(|v| if is_valid_f64(v) { v } else { f64::NAN });
    }

    /// Set every cell outside the ocean mask to NaN.
    pub fn apply_mask(&mut self, mask: &OceanMask) {
        ndarray::Zip::from(&mut self.values)
            .and(mask.as_array())
            .for_each(|v, &wet| {
                if !wet {
                    *v = f64::NAN;
                }
            });
    }

    /// Multiply every valid value by `factor` (unit conversion).
    pub fn scale(&mut self, factor: f64) {
        if factor != 1.0 {
            self.values.mapv_inplace(|v| v * factor);
        }
    }

    /// Number of ocean cells that are missing.
    pub fn missing_count(&self, mask: &OceanMask) -> usize {
        ndarray::Zip::from(&self.values)
            .and(mask.as_array())
            .fold(0, |n, &v, &wet| if wet && is_missing(v) { n + 1 } else { n })
    }

    /// Ocean cells that are missing, in `[k, j, i]` order.
    pub fn missing_cells(&self, mask: &OceanMask) -> Vec<Cell> {
        self.values
            .indexed_iter()
            .filter(|&((k, j, i), &v)| mask.is_wet(k, j, i) && is_missing(v))
            .map(|((k, j, i), _)| Cell::new(k, j, i))
            .collect()
    }

    /// Minimum and maximum over valid values, if any.
    pub fn valid_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|&v| is_valid_f64(v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
