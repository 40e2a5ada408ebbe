//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up the three logical grid axes
//! (vertical level vs row vs column).

use std::fmt;

/// Macro to generate index newtypes with common functionality.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new index.
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the raw index value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First index (0).
            pub const ZERO: Self = Self(0);

            /// Create an iterator over [0, n) indices.
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = $name> {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(idx: $name) -> usize {
                idx.0
            }
        }
    };
}

define_index!(
    /// Vertical level index (`k`), 0 at the surface.
    ///
    /// # Example
    ///
    /// ```
    /// use bgc_inputs::types::LevelIndex;
    ///
    /// let level = LevelIndex::new(5);
    /// assert_eq!(level.get(), 5);
    /// ```
    LevelIndex,
    "k"
);

define_index!(
    /// Row index (`j`) of the horizontal grid.
    RowIndex,
    "j"
);

define_index!(
    /// Column index (`i`) of the horizontal grid, cyclic in longitude.
    ColumnIndex,
    "i"
);

/// A single cell of the 3D logical grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub k: LevelIndex,
    pub j: RowIndex,
    pub i: ColumnIndex,
}

impl Cell {
    /// Create a cell from raw `(k, j, i)` indices.
    #[inline]
    pub const fn new(k: usize, j: usize, i: usize) -> Self {
        Self {
            k: LevelIndex::new(k),
            j: RowIndex::new(j),
            i: ColumnIndex::new(i),
        }
    }

    /// Raw index tuple, usable directly with `ndarray` indexing.
    #[inline]
    pub const fn as_tuple(self) -> (usize, usize, usize) {
        (self.k.get(), self.j.get(), self.i.get())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.k, self.j, self.i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_index() {
        let idx = LevelIndex::new(42);
        assert_eq!(idx.get(), 42);
        assert_eq!(usize::from(idx), 42);
    }

    #[test]
    fn test_index_iter() {
        let indices: Vec<_> = RowIndex::iter(4).collect();
        assert_eq!(indices.len(), 4);
        assert_eq!(indices[0], RowIndex::ZERO);
        assert_eq!(indices[3].get(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", LevelIndex::new(5)), "k5");
        assert_eq!(format!("{}", Cell::new(1, 2, 3)), "(k1, j2, i3)");
    }

    #[test]
    fn test_cell_tuple() {
        let cell = Cell::new(2, 0, 7);
        assert_eq!(cell.as_tuple(), (2, 0, 7));
    }
}
