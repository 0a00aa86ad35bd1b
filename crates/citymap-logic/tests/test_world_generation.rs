//! Integration tests for the full generation pipeline.
//!
//! Exercises: WorldConfig → mask → districts → bounds → water → adjacency
//! → artifact, and tile-for-tile parity with a checked-in artifact
//! generated from the reference seeds by the web client's exporter.
//!
//! All tests are pure logic: no filesystem writes, no rendering.

use std::collections::HashSet;

use citymap_logic::artifact::WorldMapArtifact;
use citymap_logic::config::{WorldConfig, WorldSeeds};
use citymap_logic::diff::diff_artifacts;
use citymap_logic::grid::{Grid, TileCoord};
use citymap_logic::validate::validate_all;
use citymap_logic::generate_world;

const REFERENCE_ARTIFACT: &str = include_str!("fixtures/reference-district-map.json");

// ── Helpers ────────────────────────────────────────────────────────────

fn reference_artifact() -> WorldMapArtifact {
    generate_world(&WorldConfig::reference())
        .expect("reference config generates")
        .to_artifact(None)
}

fn with_seeds(seeds: WorldSeeds) -> WorldConfig {
    WorldConfig {
        seeds,
        ..WorldConfig::reference()
    }
}

// ── Fixture parity ─────────────────────────────────────────────────────

#[test]
fn matches_fixture_tile_for_tile() {
    let expected = WorldMapArtifact::from_json(REFERENCE_ARTIFACT).expect("fixture parses");
    let actual = reference_artifact();
    let diff = diff_artifacts(&expected, &actual);
    assert!(
        diff.is_identical(),
        "{} keys differ: {:?}",
        diff.differing_keys(),
        diff.layers
            .iter()
            .map(|l| (&l.layer, l.only_left.len(), l.only_right.len()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn matches_fixture_byte_for_byte() {
    // Same timestamp as the fixture; everything else must follow from the seeds.
    let json = generate_world(&WorldConfig::reference())
        .unwrap()
        .to_artifact(Some("2026-10-16T14:21:53.990Z".into()))
        .to_json()
        .unwrap();
    if json != REFERENCE_ARTIFACT {
        let at = json
            .bytes()
            .zip(REFERENCE_ARTIFACT.bytes())
            .position(|(x, y)| x != y)
            .unwrap_or(json.len().min(REFERENCE_ARTIFACT.len()));
        let line = json[..at].lines().count();
        panic!("output diverges from fixture at byte {} (line {})", at, line);
    }
}

#[test]
fn district_keys_follow_declaration_order() {
    let a = reference_artifact();
    let declared: Vec<&String> = a.district_defs.iter().map(|d| &d.category).collect();
    assert_eq!(a.districts.keys().collect::<Vec<_>>(), declared);
    assert_eq!(a.district_bounds.keys().collect::<Vec<_>>(), declared);
}

#[test]
fn matches_fixture_bounds_exactly() {
    let expected = WorldMapArtifact::from_json(REFERENCE_ARTIFACT).unwrap();
    let actual = reference_artifact();
    assert_eq!(actual.district_bounds, expected.district_bounds);
    assert_eq!(actual.district_defs, expected.district_defs);

    let town = &actual.district_bounds["townsquare"];
    assert_eq!((town.min_col, town.max_col, town.min_row, town.max_row), (21, 35, 20, 35));
    assert_eq!(town.center_col, 27.727891156462587);
    assert_eq!(town.center_row, 27.87074829931973);
}

#[test]
fn reference_counts() {
    let a = reference_artifact();
    assert_eq!(a.world_mask.len(), 2814);
    assert_eq!(a.roads.len(), 262);
    assert_eq!(a.water.len(), 146);
    assert_eq!(a.road_adjacent.len(), 286);
    let sizes: Vec<(&str, usize)> = a
        .district_defs
        .iter()
        .map(|d| (d.category.as_str(), a.districts[&d.category].len()))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("townsquare", 147),
            ("creative", 498),
            ("translation", 515),
            ("code", 433),
            ("research", 446),
            ("defi", 513),
        ]
    );
}

#[test]
fn water_per_district() {
    let a = reference_artifact();
    let water: HashSet<&String> = a.water.iter().collect();
    let count = |cat: &str| a.districts[cat].iter().filter(|k| water.contains(k)).count();
    assert_eq!(count("townsquare"), 0);
    assert_eq!(count("creative"), 32);
    assert_eq!(count("translation"), 68);
    assert_eq!(count("code"), 0);
    assert_eq!(count("research"), 22);
    assert_eq!(count("defi"), 24);
}

// ── Determinism ────────────────────────────────────────────────────────

#[test]
fn regeneration_is_byte_identical() {
    let a = reference_artifact().to_json().unwrap();
    let b = reference_artifact().to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn serialize_parse_reserialize_is_identical() {
    let stamped = generate_world(&WorldConfig::reference())
        .unwrap()
        .to_artifact(Some("2026-10-16T12:00:00.000Z".into()));
    let json = stamped.to_json().unwrap();
    let again = WorldMapArtifact::from_json(&json).unwrap().to_json().unwrap();
    assert_eq!(json, again);
}

#[test]
fn fixture_reserializes_stably() {
    // Our formatting of the fixture is a fixed point.
    let first = WorldMapArtifact::from_json(REFERENCE_ARTIFACT)
        .unwrap()
        .to_json()
        .unwrap();
    let second = WorldMapArtifact::from_json(&first).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}

// ── Seed-space independence ────────────────────────────────────────────

#[test]
fn road_seed_changes_split_not_mask() {
    let base = reference_artifact();
    let changed = generate_world(&with_seeds(WorldSeeds {
        road_primary: 1,
        ..WorldSeeds::default()
    }))
    .unwrap()
    .to_artifact(None);

    assert_eq!(changed.world_mask, base.world_mask);
    assert_ne!(changed.roads, base.roads);
    assert_eq!(changed.roads.len(), 246);
    assert_eq!(changed.districts["townsquare"].len(), 150);
}

#[test]
fn district_seed_changes_split_not_mask() {
    let base = reference_artifact();
    let changed = generate_world(&with_seeds(WorldSeeds {
        district_primary: 1,
        ..WorldSeeds::default()
    }))
    .unwrap()
    .to_artifact(None);

    assert_eq!(changed.world_mask, base.world_mask);
    assert_eq!(changed.roads.len(), 251);
}

// ── Structural properties ──────────────────────────────────────────────

#[test]
fn reference_map_passes_all_checks() {
    let world = generate_world(&WorldConfig::reference()).unwrap();
    let issues = validate_all(&world);
    assert!(issues.is_empty(), "issues: {:?}", issues);
}

#[test]
fn road_and_district_sets_partition_the_mask() {
    let a = reference_artifact();
    let mask: HashSet<&String> = a.world_mask.iter().collect();
    let mut union: HashSet<&String> = a.roads.iter().collect();
    for tiles in a.districts.values() {
        for t in tiles {
            assert!(union.insert(t), "{} assigned twice", t);
        }
    }
    assert_eq!(union, mask);
}

#[test]
fn road_adjacent_tiles_touch_a_road() {
    let a = reference_artifact();
    let roads: HashSet<TileCoord> = a.roads.iter().map(|k| k.parse().unwrap()).collect();
    let grid = Grid::new(a.grid_cols, a.grid_rows);
    for key in &a.road_adjacent {
        let c: TileCoord = key.parse().unwrap();
        assert!(!roads.contains(&c));
        assert!(grid.neighbors4(c).any(|n| roads.contains(&n)), "{} has no road", key);
    }
}

// ── Degenerate-but-valid configs ───────────────────────────────────────

#[test]
fn small_grid_leaves_some_districts_empty() {
    let config = WorldConfig {
        grid: Grid::new(23, 31),
        ..WorldConfig::reference()
    };
    let world = generate_world(&config).unwrap();
    assert_eq!(world.habitable_count(), 617);
    assert_eq!(world.road_count(), 45);

    assert_eq!(world.district_tiles("townsquare").len(), 1);
    assert_eq!(world.bounds("townsquare").map(|b| b.tile_count), Some(1));
    for cat in ["translation", "code", "research"] {
        assert!(world.district_tiles(cat).is_empty());
        assert!(world.bounds(cat).is_none());
    }

    let a = world.to_artifact(None);
    assert_eq!(a.districts["code"], Vec::<String>::new());
    assert!(!a.district_bounds.contains_key("code"));
    assert_eq!(a.district_bounds.len(), 3);
    assert!(validate_all(&world).is_empty());
}

#[test]
fn single_district_claims_whole_mask() {
    let mut config = WorldConfig::reference();
    config.districts.truncate(1);
    let world = generate_world(&config).unwrap();
    assert_eq!(world.road_count(), 0);
    assert_eq!(world.road_adjacent_count(), 0);
    assert_eq!(world.district_tiles("townsquare").len(), 2814);
}
