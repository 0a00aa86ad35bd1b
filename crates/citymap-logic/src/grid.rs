//! Grid dimensions, tile coordinates, and dense per-tile storage.
//!
//! Tiles are addressed by `(col, row)`, 0-indexed. Iteration is always
//! row-major (row outer, col inner); every stage depends on that order
//! being the same in every implementation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from coordinate lookups and `"col,row"` key parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile ({col},{row}) is outside the {cols}x{rows} grid")]
    OutOfBounds {
        col: u32,
        row: u32,
        cols: u32,
        rows: u32,
    },
    #[error("malformed tile key {0:?}, expected \"col,row\"")]
    MalformedKey(String),
}

/// Fixed grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Grid {
    pub cols: u32,
    pub rows: u32,
}

impl Grid {
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i64 && row < self.rows as i64
    }

    /// Flat row-major index, or a bounds error.
    pub fn index(&self, coord: TileCoord) -> Result<usize, GridError> {
        if coord.col >= self.cols || coord.row >= self.rows {
            return Err(GridError::OutOfBounds {
                col: coord.col,
                row: coord.row,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(coord.row as usize * self.cols as usize + coord.col as usize)
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| TileCoord { col, row }))
    }

    /// In-bounds orthogonal neighbours: north, south, west, east.
    pub fn neighbors4(&self, coord: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        const OFFSETS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        OFFSETS.into_iter().filter_map(move |(dc, dr)| {
            let col = coord.col as i64 + dc;
            let row = coord.row as i64 + dr;
            self.contains(col, row)
                .then(|| TileCoord::new(col as u32, row as u32))
        })
    }
}

/// One tile position. Displays and parses as the stable `"col,row"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub col: u32,
    pub row: u32,
}

impl TileCoord {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

impl FromStr for TileCoord {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GridError::MalformedKey(s.to_string());
        let (col, row) = s.split_once(',').ok_or_else(malformed)?;
        Ok(Self {
            col: col.parse().map_err(|_| malformed())?,
            row: row.parse().map_err(|_| malformed())?,
        })
    }
}

/// Dense per-tile storage over a [`Grid`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid<T> {
    grid: Grid,
    cells: Vec<T>,
}

impl<T: Clone> TileGrid<T> {
    pub fn filled(grid: Grid, value: T) -> Self {
        Self {
            grid,
            cells: vec![value; grid.len()],
        }
    }
}

impl<T> TileGrid<T> {
    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn get(&self, coord: TileCoord) -> Result<&T, GridError> {
        let idx = self.grid.index(coord)?;
        Ok(&self.cells[idx])
    }

    pub fn set(&mut self, coord: TileCoord, value: T) -> Result<(), GridError> {
        let idx = self.grid.index(coord)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// A same-shaped grid built from each `(coord, value)`.
    pub fn map<U>(&self, mut f: impl FnMut(TileCoord, &T) -> U) -> TileGrid<U> {
        TileGrid {
            grid: self.grid,
            cells: self.iter().map(|(c, v)| f(c, v)).collect(),
        }
    }

    /// `(coord, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        self.grid.coords().zip(self.cells.iter())
    }
}

impl TileGrid<bool> {
    /// Coordinates of every `true` cell, row-major.
    pub fn marked(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.iter().filter(|(_, v)| **v).map(|(c, _)| c)
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        let c = TileCoord::new(12, 7);
        assert_eq!(c.key(), "12,7");
        assert_eq!("12,7".parse::<TileCoord>(), Ok(c));
    }

    #[test]
    fn test_malformed_keys_rejected() {
        for bad in ["", "3", "3;4", "a,1", "1,-2", "1,2,3"] {
            assert!(
                matches!(bad.parse::<TileCoord>(), Err(GridError::MalformedKey(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_row_major_order() {
        let grid = Grid::new(3, 2);
        let keys: Vec<String> = grid.coords().map(|c| c.key()).collect();
        assert_eq!(keys, ["0,0", "1,0", "2,0", "0,1", "1,1", "2,1"]);
    }

    #[test]
    fn test_index_bounds_error() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.index(TileCoord::new(3, 3)), Ok(15));
        assert_eq!(
            grid.index(TileCoord::new(4, 0)),
            Err(GridError::OutOfBounds {
                col: 4,
                row: 0,
                cols: 4,
                rows: 4
            })
        );
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let grid = Grid::new(5, 5);
        let corner: Vec<_> = grid.neighbors4(TileCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![TileCoord::new(0, 1), TileCoord::new(1, 0)]);
        assert_eq!(grid.neighbors4(TileCoord::new(2, 2)).count(), 4);
    }

    #[test]
    fn test_tile_grid_marked() {
        let grid = Grid::new(3, 3);
        let mut cells = TileGrid::filled(grid, false);
        cells.set(TileCoord::new(2, 0), true).unwrap();
        cells.set(TileCoord::new(0, 2), true).unwrap();
        assert_eq!(cells.count(), 2);
        let marked: Vec<_> = cells.marked().collect();
        assert_eq!(marked, vec![TileCoord::new(2, 0), TileCoord::new(0, 2)]);
        assert!(cells.set(TileCoord::new(3, 3), true).is_err());
    }
}
