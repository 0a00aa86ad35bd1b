//! The finished map: every tile classified, with derived flags and bounds.
//!
//! `WorldMap` is read-only once built. Consumers that place structures
//! should ask for [`WorldMap::building_plots`] rather than re-deriving road
//! frontage themselves.

use crate::bounds::DistrictBounds;
use crate::config::DistrictDef;
use crate::districts::{DistrictAssignment, TileKind};
use crate::grid::{Grid, GridError, TileCoord, TileGrid};

/// One classified tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub water: bool,
    pub road_adjacent: bool,
}

impl Tile {
    pub fn is_road(&self) -> bool {
        self.kind == TileKind::Road
    }

    pub fn is_habitable(&self) -> bool {
        self.kind != TileKind::Void
    }

    /// District index, if this tile belongs to one.
    pub fn district(&self) -> Option<usize> {
        match self.kind {
            TileKind::District(i) => Some(i),
            _ => None,
        }
    }
}

/// Generated world map.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    districts: Vec<DistrictDef>,
    tiles: TileGrid<Tile>,
    members: Vec<Vec<TileCoord>>,
    roads: Vec<TileCoord>,
    bounds: Vec<Option<DistrictBounds>>,
}

impl WorldMap {
    pub(crate) fn assemble(
        districts: Vec<DistrictDef>,
        assignment: DistrictAssignment,
        bounds: Vec<Option<DistrictBounds>>,
        water: &TileGrid<bool>,
        adjacency: &TileGrid<bool>,
    ) -> Self {
        let (kinds, members, roads) = assignment.into_parts();
        let tiles = kinds.map(|coord, &kind| Tile {
            kind,
            water: water.get(coord).copied().unwrap_or(false),
            road_adjacent: adjacency.get(coord).copied().unwrap_or(false),
        });
        Self {
            districts,
            tiles,
            members,
            roads,
            bounds,
        }
    }

    pub fn grid(&self) -> Grid {
        self.tiles.grid()
    }

    /// Declared districts, in declaration order.
    pub fn districts(&self) -> &[DistrictDef] {
        &self.districts
    }

    pub fn district_index(&self, category: &str) -> Option<usize> {
        self.districts.iter().position(|d| d.category == category)
    }

    pub fn tile(&self, col: u32, row: u32) -> Result<Tile, GridError> {
        self.tiles.get(TileCoord::new(col, row)).copied()
    }

    /// The district owning `(col, row)`; `None` for road and void.
    pub fn district_at(&self, col: u32, row: u32) -> Result<Option<&DistrictDef>, GridError> {
        let tile = self.tile(col, row)?;
        Ok(tile.district().and_then(|i| self.districts.get(i)))
    }

    /// All tiles with their coordinates, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, &Tile)> {
        self.tiles.iter()
    }

    pub fn habitable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles().filter(|(_, t)| t.is_habitable()).map(|(c, _)| c)
    }

    pub fn road_tiles(&self) -> &[TileCoord] {
        &self.roads
    }

    pub fn water_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles().filter(|(_, t)| t.water).map(|(c, _)| c)
    }

    pub fn road_adjacent_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles().filter(|(_, t)| t.road_adjacent).map(|(c, _)| c)
    }

    /// Member tiles of `category`, row-major. Unknown or empty categories
    /// both yield an empty slice.
    pub fn district_tiles(&self, category: &str) -> &[TileCoord] {
        self.district_index(category)
            .and_then(|i| self.members.get(i))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Bounds of `category`; `None` means the district produced no tiles.
    pub fn bounds(&self, category: &str) -> Option<&DistrictBounds> {
        self.district_index(category)
            .and_then(|i| self.bounds.get(i))
            .and_then(Option::as_ref)
    }

    /// Bounds indexed like [`districts`](Self::districts).
    pub fn all_bounds(&self) -> &[Option<DistrictBounds>] {
        &self.bounds
    }

    /// Dry, road-fronting tiles of `category`, row-major.
    pub fn building_plots(&self, category: &str) -> Vec<TileCoord> {
        self.district_tiles(category)
            .iter()
            .copied()
            .filter(|&c| {
                self.tiles
                    .get(c)
                    .map_or(false, |t| t.road_adjacent && !t.water)
            })
            .collect()
    }

    pub fn habitable_count(&self) -> usize {
        self.habitable_tiles().count()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn water_count(&self) -> usize {
        self.water_tiles().count()
    }

    pub fn road_adjacent_count(&self) -> usize {
        self.road_adjacent_tiles().count()
    }
}
