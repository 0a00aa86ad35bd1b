//! Structural checks over a generated [`WorldMap`].
//!
//! Pure functions returning issues rather than panicking, so the exporter's
//! self-check and the test suite can share them.

use std::collections::HashSet;

use crate::bounds::DistrictBounds;
use crate::districts::TileKind;
use crate::grid::TileCoord;
use crate::world::WorldMap;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub category: &'static str,
    pub message: String,
}

fn issue(category: &'static str, message: String) -> ValidationIssue {
    ValidationIssue { category, message }
}

// ── Partition ───────────────────────────────────────────────────────────

/// Every habitable tile is a road or in exactly one district; member lists
/// agree with per-tile kinds.
pub fn check_partition(world: &WorldMap) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen: HashSet<TileCoord> = HashSet::new();

    for (i, d) in world.districts().iter().enumerate() {
        for &coord in world.district_tiles(&d.category) {
            if !seen.insert(coord) {
                issues.push(issue(
                    "partition",
                    format!("tile {} listed in more than one district", coord),
                ));
            }
            match world.tile(coord.col, coord.row) {
                Ok(t) if t.kind == TileKind::District(i) => {}
                Ok(t) => issues.push(issue(
                    "partition",
                    format!("tile {} listed in {} but classified {:?}", coord, d.category, t.kind),
                )),
                Err(e) => issues.push(issue("partition", e.to_string())),
            }
        }
    }

    for &coord in world.road_tiles() {
        if !seen.insert(coord) {
            issues.push(issue(
                "partition",
                format!("road tile {} is also a district tile", coord),
            ));
        }
    }

    let habitable = world.habitable_count();
    if seen.len() != habitable {
        issues.push(issue(
            "partition",
            format!(
                "{} roads + district tiles vs {} habitable tiles",
                seen.len(),
                habitable
            ),
        ));
    }
    issues
}

// ── Bounds ──────────────────────────────────────────────────────────────

/// Non-empty districts have consistent bounds; empty ones have none.
pub fn check_bounds(world: &WorldMap) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (d, bounds) in world.districts().iter().zip(world.all_bounds()) {
        let tiles = world.district_tiles(&d.category);
        match bounds {
            None if tiles.is_empty() => {}
            None => issues.push(issue(
                "bounds",
                format!("{} has {} tiles but no bounds", d.category, tiles.len()),
            )),
            Some(b) => issues.extend(check_one_bounds(&d.category, b, tiles)),
        }
    }
    issues
}

fn check_one_bounds(category: &str, b: &DistrictBounds, tiles: &[TileCoord]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if b.tile_count != tiles.len() {
        issues.push(issue(
            "bounds",
            format!("{} tileCount {} != {} tiles", category, b.tile_count, tiles.len()),
        ));
    }
    let col_ok = f64::from(b.min_col) <= b.center_col && b.center_col <= f64::from(b.max_col);
    let row_ok = f64::from(b.min_row) <= b.center_row && b.center_row <= f64::from(b.max_row);
    if !col_ok || !row_ok {
        issues.push(issue(
            "bounds",
            format!(
                "{} centroid ({:.2},{:.2}) outside box {}..={} × {}..={}",
                category, b.center_col, b.center_row, b.min_col, b.max_col, b.min_row, b.max_row
            ),
        ));
    }
    if let Some(outside) = tiles.iter().find(|t| !b.contains(**t)) {
        issues.push(issue(
            "bounds",
            format!("{} tile {} outside its bounds", category, outside),
        ));
    }
    issues
}

// ── Road adjacency ──────────────────────────────────────────────────────

/// A tile is flagged road-adjacent iff it is a district tile with a road
/// on one of its four sides.
pub fn check_adjacency(world: &WorldMap) -> Vec<ValidationIssue> {
    let grid = world.grid();
    let mut issues = Vec::new();
    for (coord, tile) in world.tiles() {
        let touches_road = grid
            .neighbors4(coord)
            .any(|n| world.tile(n.col, n.row).map_or(false, |t| t.is_road()));
        let expected = tile.district().is_some() && touches_road;
        if tile.road_adjacent != expected {
            issues.push(issue(
                "adjacency",
                format!(
                    "tile {} road_adjacent={} but expected {}",
                    coord, tile.road_adjacent, expected
                ),
            ));
        }
    }
    issues
}

// ── Water ───────────────────────────────────────────────────────────────

/// A tile is water iff it is a district tile satisfying that district's rule.
pub fn check_water(world: &WorldMap) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (coord, tile) in world.tiles() {
        let expected = tile.district().map_or(false, |i| {
            let rule = world.districts().get(i).and_then(|d| d.water.as_ref());
            let bounds = world.all_bounds().get(i).and_then(Option::as_ref);
            match (rule, bounds) {
                (Some(r), Some(b)) => r.is_water(coord, b),
                _ => false,
            }
        });
        if tile.water != expected {
            issues.push(issue(
                "water",
                format!("tile {} water={} but expected {}", coord, tile.water, expected),
            ));
        }
    }
    issues
}

// ── Master validation ───────────────────────────────────────────────────

/// Run every check.
pub fn validate_all(world: &WorldMap) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    issues.extend(check_partition(world));
    issues.extend(check_bounds(world));
    issues.extend(check_adjacency(world));
    issues.extend(check_water(world));
    issues
}
