//! The exported map document.
//!
//! Tile sets are written as sorted, deduplicated `"col,row"` string keys so
//! regenerated artifacts diff cleanly. Sorting is by key string, not by
//! coordinate value (`"10,3"` sorts before `"2,0"`), which keeps the output
//! identical to every other exporter of this format.
//!
//! Per-category objects keep district declaration order, so an artifact
//! written here is byte-identical to one written by any exporter that
//! iterates the declared districts.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use thiserror::Error;

use crate::bounds::DistrictBounds;
use crate::grid::TileCoord;
use crate::world::WorldMap;

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported artifact version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Identity and seed point of one district, as published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictMeta {
    pub name: String,
    pub category: String,
    pub seed_col: i32,
    pub seed_row: i32,
}

// ── Category map ───────────────────────────────────────────────────────

/// String-keyed map that keeps insertion order, serialized as a JSON object.
///
/// A handful of categories at most, so lookups are linear scans.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for CategoryMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> CategoryMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == category)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, category: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == category)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    /// Replace the value in place if the key exists, otherwise append.
    /// Returns the previous value.
    pub fn insert(&mut self, category: String, value: V) -> Option<V> {
        match self.get_mut(&category) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((category, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> FromIterator<(String, V)> for CategoryMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V, Q: AsRef<str> + ?Sized> Index<&Q> for CategoryMap<V> {
    type Output = V;

    /// Panics if the category is absent, like `BTreeMap`.
    fn index(&self, category: &Q) -> &V {
        let category = category.as_ref();
        match self.get(category) {
            Some(v) => v,
            None => panic!("no category {:?}", category),
        }
    }
}

impl<V: Serialize> Serialize for CategoryMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct CategoryMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for CategoryMapVisitor<V> {
    type Value = CategoryMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object keyed by district category")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = CategoryMap::new();
        while let Some((k, v)) = access.next_entry::<String, V>()? {
            map.insert(k, v);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for CategoryMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryMapVisitor(PhantomData))
    }
}

// ── Artifact ───────────────────────────────────────────────────────────

/// Serialized world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldMapArtifact {
    pub version: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    /// ISO-8601 UTC. Omitted for reproducible exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub world_mask: Vec<String>,
    pub roads: Vec<String>,
    pub water: Vec<String>,
    pub road_adjacent: Vec<String>,
    /// Every declared category in declaration order; empty list when a
    /// district got no tiles.
    pub districts: CategoryMap<Vec<String>>,
    /// Only categories with at least one tile, in declaration order.
    pub district_bounds: CategoryMap<DistrictBounds>,
    pub district_defs: Vec<DistrictMeta>,
}

fn sorted_keys(coords: impl IntoIterator<Item = TileCoord>) -> Vec<String> {
    coords
        .into_iter()
        .map(|c| c.key())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl WorldMapArtifact {
    pub fn from_world(world: &WorldMap, generated_at: Option<String>) -> Self {
        let grid = world.grid();
        let districts = world
            .districts()
            .iter()
            .map(|d| {
                let tiles = world.district_tiles(&d.category).iter().copied();
                (d.category.clone(), sorted_keys(tiles))
            })
            .collect();
        let district_bounds = world
            .districts()
            .iter()
            .zip(world.all_bounds())
            .filter_map(|(d, b)| b.map(|b| (d.category.clone(), b)))
            .collect();
        let district_defs = world
            .districts()
            .iter()
            .map(|d| DistrictMeta {
                name: d.name.clone(),
                category: d.category.clone(),
                seed_col: d.seed_col,
                seed_row: d.seed_row,
            })
            .collect();

        Self {
            version: FORMAT_VERSION,
            grid_cols: grid.cols,
            grid_rows: grid.rows,
            generated_at,
            world_mask: sorted_keys(world.habitable_tiles()),
            roads: sorted_keys(world.road_tiles().iter().copied()),
            water: sorted_keys(world.water_tiles()),
            road_adjacent: sorted_keys(world.road_adjacent_tiles()),
            districts,
            district_bounds,
            district_defs,
        }
    }

    /// Pretty-printed JSON, two-space indent.
    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an artifact, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_str(json)?;
        if artifact.version != FORMAT_VERSION {
            return Err(ArtifactError::VersionMismatch {
                expected: FORMAT_VERSION,
                found: artifact.version,
            });
        }
        Ok(artifact)
    }
}

impl WorldMap {
    pub fn to_artifact(&self, generated_at: Option<String>) -> WorldMapArtifact {
        WorldMapArtifact::from_world(self, generated_at)
    }
}
