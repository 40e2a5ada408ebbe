//! Horizontal neighbor topology for logically rectangular ocean grids.
//!
//! Columns (`i`) are cyclic in longitude. Rows (`j`) are not cyclic; on a
//! tripolar grid row 0 is the northern seam and folds onto itself, so that
//! stepping off row 0 from column `i` lands on row 0 at column `ni - 1 - i`.
//!
//! All neighbor lookups go through [`NeighborMap`], obtained for the eight
//! horizontal directions with [`neighbor_offsets`].
//!
//! # Example
//!
//! ```
//! use bgc_inputs::grid::{Direction, GridTopology, neighbor_offsets};
//!
//! let topo = GridTopology::new(4, 6, true);
//! let maps = neighbor_offsets(&topo);
//!
//! // Stepping north from the fold row reflects the column.
//! let north = maps.iter().find(|m| m.direction() == Direction::North).unwrap();
//! assert_eq!(north.apply(0, 1), Some((0, 4)));
//!
//! // Longitude wraps.
//! let east = maps.iter().find(|m| m.direction() == Direction::East).unwrap();
//! assert_eq!(east.apply(2, 5), Some((2, 0)));
//! ```

use std::fmt;

/// Horizontal topology of the destination grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridTopology {
    nj: usize,
    ni: usize,
    tripolar: bool,
}

impl GridTopology {
    /// Create a topology for an `nj x ni` horizontal grid.
    pub const fn new(nj: usize, ni: usize, tripolar: bool) -> Self {
        Self { nj, ni, tripolar }
    }

    /// Number of rows.
    #[inline]
    pub const fn nj(&self) -> usize {
        self.nj
    }

    /// Number of columns.
    #[inline]
    pub const fn ni(&self) -> usize {
        self.ni
    }

    /// Whether row 0 is a tripolar fold.
    #[inline]
    pub const fn is_tripolar(&self) -> bool {
        self.tripolar
    }

    /// Iterate over all existing 8-connected neighbors of column `(j, i)`.
    ///
    /// A neighbor can appear more than once on very narrow grids (e.g. when
    /// `ni < 3` the east and west neighbors coincide).
    pub fn neighbors(&self, j: usize, i: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        Direction::ALL
            .iter()
            .filter_map(move |&d| NeighborMap::new(*self, d).apply(j, i))
    }
}

/// One of the eight horizontal directions.
///
/// North points toward row 0 (decreasing `j`); east is increasing `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Index offset `(dj, di)` for this direction.
    #[inline]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        };
        f.write_str(name)
    }
}

/// Index mapping from a column to its neighbor in one fixed direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborMap {
    topology: GridTopology,
    direction: Direction,
}

impl NeighborMap {
    /// Create the mapping for `direction` on `topology`.
    pub const fn new(topology: GridTopology, direction: Direction) -> Self {
        Self { topology, direction }
    }

    /// Direction this map steps in.
    #[inline]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Map column `(j, i)` to its neighbor, or `None` if the neighbor is
    /// off-grid.
    ///
    /// `(j, i)` must lie inside the grid.
    #[inline]
    pub fn apply(&self, j: usize, i: usize) -> Option<(usize, usize)> {
        let GridTopology { nj, ni, tripolar } = self.topology;
        debug_assert!(j < nj && i < ni, "column ({j}, {i}) outside {nj}x{ni} grid");

        let (dj, di) = self.direction.offset();
        let i_new = (i as isize + di).rem_euclid(ni as isize) as usize;
        let j_new = j as isize + dj;

        if j_new < 0 {
            // Off the seam: a tripolar grid folds back onto row 0 reversed.
            return tripolar.then(|| (0, ni - 1 - i_new));
        }
        if j_new as usize >= nj {
            return None;
        }
        Some((j_new as usize, i_new))
    }
}

/// Neighbor mappings for all eight horizontal directions.
pub fn neighbor_offsets(topology: &GridTopology) -> [NeighborMap; 8] {
    Direction::ALL.map(|d| NeighborMap::new(*topology, d))
}
