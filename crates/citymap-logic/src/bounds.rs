//! Per-district bounding boxes and centroids.

use serde::{Deserialize, Serialize, Serializer};

use crate::districts::DistrictAssignment;
use crate::grid::TileCoord;

/// Extent, centroid and size of one district's tile set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictBounds {
    pub min_col: u32,
    pub max_col: u32,
    pub min_row: u32,
    pub max_row: u32,
    /// Arithmetic mean column of all member tiles.
    #[serde(serialize_with = "serialize_centroid")]
    pub center_col: f64,
    /// Arithmetic mean row of all member tiles.
    #[serde(serialize_with = "serialize_centroid")]
    pub center_row: f64,
    pub tile_count: usize,
}

/// Whole-number centroids are written without a fractional part (`28`,
/// not `28.0`), matching how JSON numbers are printed by other exporters.
fn serialize_centroid<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // Beyond 2^53 an f64 no longer names a unique integer.
    const EXACT_INT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_INT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl DistrictBounds {
    /// Reduce a tile set. `None` for an empty set: zero tiles has no bounds.
    pub fn from_tiles(tiles: &[TileCoord]) -> Option<Self> {
        let first = tiles.first()?;
        let mut b = DistrictBounds {
            min_col: first.col,
            max_col: first.col,
            min_row: first.row,
            max_row: first.row,
            center_col: 0.0,
            center_row: 0.0,
            tile_count: tiles.len(),
        };
        let (mut sum_col, mut sum_row) = (0u64, 0u64);
        for t in tiles {
            b.min_col = b.min_col.min(t.col);
            b.max_col = b.max_col.max(t.col);
            b.min_row = b.min_row.min(t.row);
            b.max_row = b.max_row.max(t.row);
            sum_col += u64::from(t.col);
            sum_row += u64::from(t.row);
        }
        b.center_col = sum_col as f64 / tiles.len() as f64;
        b.center_row = sum_row as f64 / tiles.len() as f64;
        Some(b)
    }

    /// Half the column span, floored at 1.
    pub fn half_extent_col(&self) -> f64 {
        (f64::from(self.max_col - self.min_col) / 2.0).max(1.0)
    }

    /// Half the row span, floored at 1.
    pub fn half_extent_row(&self) -> f64 {
        (f64::from(self.max_row - self.min_row) / 2.0).max(1.0)
    }

    /// Offset from the centroid in half-extent units.
    pub fn normalize(&self, coord: TileCoord) -> (f64, f64) {
        (
            (f64::from(coord.col) - self.center_col) / self.half_extent_col(),
            (f64::from(coord.row) - self.center_row) / self.half_extent_row(),
        )
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        (self.min_col..=self.max_col).contains(&coord.col)
            && (self.min_row..=self.max_row).contains(&coord.row)
    }
}

/// Bounds for every declared district, indexed like the district list.
pub fn compute_bounds(assignment: &DistrictAssignment) -> Vec<Option<DistrictBounds>> {
    assignment
        .members()
        .iter()
        .map(|tiles| DistrictBounds::from_tiles(tiles))
        .collect()
}
