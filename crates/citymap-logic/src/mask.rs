//! Habitable-land mask.
//!
//! Each cell is projected to isometric screen space and tested against an
//! ellipse whose radius is wobbled by a three-octave noise blend, giving an
//! organic coastline instead of a clean diamond.

use crate::config::WorldSeeds;
use crate::grid::{Grid, TileCoord, TileGrid};
use crate::noise::{NoiseError, ValueNoise2D};

const OUTER_LATTICE: usize = 24;
const MID_LATTICE: usize = 32;
const FINE_LATTICE: usize = 48;

/// Horizontal / vertical ellipse radii as a fraction of `cols + rows`.
const RADIUS_X_FACTOR: f64 = 0.38;
const RADIUS_Y_FACTOR: f64 = 0.36;

/// Which cells are part of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMask {
    cells: TileGrid<bool>,
    len: usize,
}

impl WorldMask {
    pub fn grid(&self) -> Grid {
        self.cells.grid()
    }

    /// Out-of-grid coordinates are never habitable.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.cells.get(coord).copied().unwrap_or(false)
    }

    /// Number of habitable cells.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Habitable cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.cells.marked()
    }

    pub fn cells(&self) -> &TileGrid<bool> {
        &self.cells
    }
}

/// The three boundary fields at their fixed lattice sizes.
struct BoundaryNoise {
    outer: ValueNoise2D,
    mid: ValueNoise2D,
    fine: ValueNoise2D,
}

impl BoundaryNoise {
    fn new(seeds: &WorldSeeds) -> Result<Self, NoiseError> {
        Ok(Self {
            outer: ValueNoise2D::new(OUTER_LATTICE, seeds.mask_outer)?,
            mid: ValueNoise2D::new(MID_LATTICE, seeds.mask_mid)?,
            fine: ValueNoise2D::new(FINE_LATTICE, seeds.mask_fine)?,
        })
    }

    /// Squared-distance cutoff for a cell, around 1.0 ± 0.4.
    fn threshold(&self, col: f64, row: f64) -> f64 {
        let n1 = self.outer.sample(col * 0.18 + 50.0, row * 0.18 + 50.0);
        let n2 = self.mid.sample(col * 0.4 + 70.0, row * 0.4 + 70.0);
        let n3 = self.fine.sample(col * 0.8 + 30.0, row * 0.8 + 30.0);
        let n = n1 * 0.5 + n2 * 0.3 + n3 * 0.2;
        1.0 + (n - 0.5) * 0.8
    }
}

/// Select habitable cells. Only the three mask seeds are read.
pub fn generate_world_mask(grid: Grid, seeds: &WorldSeeds) -> Result<WorldMask, NoiseError> {
    let noise = BoundaryNoise::new(seeds)?;

    let cx = f64::from(grid.cols) / 2.0;
    let cy = f64::from(grid.rows) / 2.0;
    let screen_cx = cx - cy;
    let screen_cy = cx + cy;
    let span = f64::from(grid.cols) + f64::from(grid.rows);
    let rx = span * RADIUS_X_FACTOR;
    let ry = span * RADIUS_Y_FACTOR;

    let empty = TileGrid::filled(grid, false);
    let cells = empty.map(|coord, _| {
        let col = f64::from(coord.col);
        let row = f64::from(coord.row);
        let nx = ((col - row) - screen_cx) / rx;
        let ny = ((col + row) - screen_cy) / ry;
        let dist = nx * nx + ny * ny;
        dist < noise.threshold(col, row)
    });
    let len = cells.count();

    Ok(WorldMask { cells, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_mask_size() {
        let mask = generate_world_mask(Grid::new(56, 56), &WorldSeeds::default()).unwrap();
        assert_eq!(mask.len(), 2814);
        assert_eq!(mask.iter().count(), 2814);
    }

    #[test]
    fn test_reference_mask_edges() {
        let mask = generate_world_mask(Grid::new(56, 56), &WorldSeeds::default()).unwrap();
        assert!(mask.contains(TileCoord::new(0, 13)));
        assert!(!mask.contains(TileCoord::new(0, 12)));
        assert!(mask.contains(TileCoord::new(28, 28)));
        assert!(!mask.contains(TileCoord::new(0, 0)));
        assert!(!mask.contains(TileCoord::new(56, 28)));
    }

    #[test]
    fn test_only_mask_seeds_matter() {
        let grid = Grid::new(40, 40);
        let base = generate_world_mask(grid, &WorldSeeds::default()).unwrap();
        let other = WorldSeeds {
            district_primary: 1,
            district_detail: 2,
            road_primary: 3,
            road_detail: 4,
            ..WorldSeeds::default()
        };
        assert_eq!(generate_world_mask(grid, &other).unwrap(), base);

        let moved = WorldSeeds {
            mask_fine: 1234,
            ..WorldSeeds::default()
        };
        assert_ne!(generate_world_mask(grid, &moved).unwrap(), base);
    }

    #[test]
    fn test_centre_is_habitable_on_odd_grid() {
        let mask = generate_world_mask(Grid::new(21, 15), &WorldSeeds::default()).unwrap();
        assert!(mask.contains(TileCoord::new(10, 7)));
        assert!(!mask.is_empty());
    }
}
