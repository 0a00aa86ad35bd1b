//! Per-district water predicates.
//!
//! Runs after assignment and bounds: a tile's position is normalised
//! against its district's centroid and half-extent, then tested against
//! that district's [`WaterRule`].

use serde::{Deserialize, Serialize};

use crate::bounds::DistrictBounds;
use crate::districts::{DistrictAssignment, GenerationContext, TileKind};
use crate::grid::{TileCoord, TileGrid};

/// Shape of the water inside one district.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WaterRule {
    /// Shoreline past a normalised-x cutoff.
    Coast { cutoff: f64 },
    /// Small disc around the centroid.
    #[serde(rename_all = "camelCase")]
    Pond { radius_sq: f64 },
    /// Narrow band along the normalised diagonal.
    #[serde(rename_all = "camelCase")]
    Canal { half_width: f64 },
    /// Scattered pools from two crossed waves over raw tile coordinates.
    #[serde(rename_all = "camelCase")]
    Ripples {
        col_freq: f64,
        row_freq: f64,
        threshold: f64,
    },
}

impl WaterRule {
    /// Does `coord` (a member of the district with `bounds`) hold water?
    pub fn is_water(&self, coord: TileCoord, bounds: &DistrictBounds) -> bool {
        let (nx, ny) = bounds.normalize(coord);
        match *self {
            WaterRule::Coast { cutoff } => nx > cutoff,
            WaterRule::Pond { radius_sq } => nx * nx + ny * ny < radius_sq,
            WaterRule::Canal { half_width } => (nx - ny).abs() < half_width,
            WaterRule::Ripples {
                col_freq,
                row_freq,
                threshold,
            } => {
                let col = coord.col as f64;
                let row = coord.row as f64;
                (col * col_freq).sin() * (row * row_freq).cos() > threshold
            }
        }
    }

    /// Named numeric parameters, for config validation.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match *self {
            WaterRule::Coast { cutoff } => vec![("water.cutoff", cutoff)],
            WaterRule::Pond { radius_sq } => vec![("water.radiusSq", radius_sq)],
            WaterRule::Canal { half_width } => vec![("water.halfWidth", half_width)],
            WaterRule::Ripples {
                col_freq,
                row_freq,
                threshold,
            } => vec![
                ("water.colFreq", col_freq),
                ("water.rowFreq", row_freq),
                ("water.threshold", threshold),
            ],
        }
    }
}

/// Flag water tiles. Districts without a rule, or without bounds, never
/// produce water. `bounds` is indexed like `ctx.districts()`.
pub fn classify_water(
    assignment: &DistrictAssignment,
    ctx: &GenerationContext,
    bounds: &[Option<DistrictBounds>],
) -> TileGrid<bool> {
    assignment.kinds().map(|coord, kind| {
        let TileKind::District(idx) = *kind else {
            return false;
        };
        let rule = ctx.districts().get(idx).and_then(|d| d.water.as_ref());
        match (rule, bounds.get(idx)) {
            (Some(rule), Some(Some(b))) => rule.is_water(coord, b),
            _ => false,
        }
    })
}
