//! Logical grid dimensions.

use std::fmt;

/// Dimensions of the 3D logical grid `(nk, nj, ni)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Number of vertical levels
    pub nk: usize,
    /// Number of rows
    pub nj: usize,
    /// Number of columns (cyclic)
    pub ni: usize,
}

impl GridShape {
    /// Create a new grid shape.
    #[inline]
    pub const fn new(nk: usize, nj: usize, ni: usize) -> Self {
        Self { nk, nj, ni }
    }

    /// Shape as an `ndarray` dimension tuple.
    #[inline]
    pub const fn dim(&self) -> (usize, usize, usize) {
        (self.nk, self.nj, self.ni)
    }

    /// Horizontal shape `(nj, ni)`.
    #[inline]
    pub const fn horizontal(&self) -> (usize, usize) {
        (self.nj, self.ni)
    }

    /// Total number of cells.
    #[inline]
    pub const fn n_cells(&self) -> usize {
        self.nk * self.nj * self.ni
    }

    /// Number of horizontal columns.
    #[inline]
    pub const fn n_columns(&self) -> usize {
        self.nj * self.ni
    }
}

impl From<(usize, usize, usize)> for GridShape {
    fn from((nk, nj, ni): (usize, usize, usize)) -> Self {
        Self::new(nk, nj, ni)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.nk, self.nj, self.ni)
    }
}
