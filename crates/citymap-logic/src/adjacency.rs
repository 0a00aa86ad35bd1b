//! Road frontage: district tiles touching a road on a cardinal side.

use crate::districts::{DistrictAssignment, TileKind};
use crate::grid::TileGrid;

/// Flag district tiles with at least one orthogonal road neighbour.
/// Road and void tiles are never flagged.
pub fn compute_road_adjacency(assignment: &DistrictAssignment) -> TileGrid<bool> {
    let kinds = assignment.kinds();
    let grid = kinds.grid();
    kinds.map(|coord, kind| {
        matches!(kind, TileKind::District(_))
            && grid
                .neighbors4(coord)
                .any(|n| assignment.kind_at(n) == TileKind::Road)
    })
}
