//! Strongly-typed grid indices and shapes.
//!
//! Newtypes keep the three logical axes apart: `LevelIndex` (`k`, 0 at the
//! surface), `RowIndex` (`j`, row 0 is the fold row on tripolar grids) and
//! `ColumnIndex` (`i`, cyclic in longitude).
//!
//! # Example
//!
//! ```
//! use bgc_inputs::types::{Cell, GridShape};
//!
//! let shape = GridShape::new(3, 3, 3);
//! assert_eq!(shape.n_cells(), 27);
//!
//! let cell = Cell::new(1, 1, 1);
//! assert_eq!(cell.as_tuple(), (1, 1, 1));
//! ```

mod indices;
mod shape;

pub use indices::{Cell, ColumnIndex, LevelIndex, RowIndex};
pub use shape::GridShape;
