//! In-process self-check run by `--check`.
//!
//! Each check yields named pass/fail results; `main` prints them and exits
//! non-zero if any failed.

use citymap_logic::artifact::WorldMapArtifact;
use citymap_logic::config::WorldConfig;
use citymap_logic::validate::{self, ValidationIssue};
use citymap_logic::{generate_world, WorldMap};

pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

fn from_issues(name: &str, issues: Vec<ValidationIssue>, ok_detail: &str) -> TestResult {
    TestResult {
        name: name.into(),
        passed: issues.is_empty(),
        detail: match issues.first() {
            None => ok_detail.into(),
            Some(first) => format!("{} issue(s), first: {}", issues.len(), first.message),
        },
    }
}

/// Run every check over `world`, which was generated from `config`.
pub fn run_checks(config: &WorldConfig, world: &WorldMap) -> Vec<TestResult> {
    let mut results = Vec::new();
    results.extend(check_structure(world));
    results.extend(check_determinism(config, world));
    results.extend(check_artifact(world));
    results
}

// ── 1. Structure ────────────────────────────────────────────────────────

fn check_structure(world: &WorldMap) -> Vec<TestResult> {
    println!("--- Structure ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "mask_not_empty".into(),
        passed: world.habitable_count() > 0,
        detail: format!("{} habitable tiles", world.habitable_count()),
    });

    results.push(from_issues(
        "partition",
        validate::check_partition(world),
        "every habitable tile is a road or in exactly one district",
    ));
    results.push(from_issues(
        "bounds",
        validate::check_bounds(world),
        "bounds agree with member tiles",
    ));
    results.push(from_issues(
        "road_adjacency",
        validate::check_adjacency(world),
        "road frontage flags match neighbours",
    ));
    results.push(from_issues(
        "water",
        validate::check_water(world),
        "water tiles satisfy their district rule",
    ));

    // Empty districts are legal on small grids; report them without failing.
    let empty: Vec<&str> = world
        .districts()
        .iter()
        .filter(|d| world.district_tiles(&d.category).is_empty())
        .map(|d| d.category.as_str())
        .collect();
    results.push(TestResult {
        name: "districts_populated".into(),
        passed: true,
        detail: if empty.is_empty() {
            format!("all {} districts have tiles", world.districts().len())
        } else {
            format!("empty: {}", empty.join(", "))
        },
    });

    results
}

// ── 2. Determinism ──────────────────────────────────────────────────────

fn check_determinism(config: &WorldConfig, world: &WorldMap) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let first = world.to_artifact(None);
    let result = match generate_world(config) {
        Ok(again) => {
            let second = again.to_artifact(None);
            TestResult {
                name: "regenerate_identical".into(),
                passed: first == second,
                detail: if first == second {
                    "second run produced the same artifact".into()
                } else {
                    "second run differs".into()
                },
            }
        }
        Err(e) => TestResult {
            name: "regenerate_identical".into(),
            passed: false,
            detail: format!("second run failed: {}", e),
        },
    };
    vec![result]
}

// ── 3. Artifact ─────────────────────────────────────────────────────────

fn check_artifact(world: &WorldMap) -> Vec<TestResult> {
    println!("--- Artifact ---");
    let mut results = Vec::new();
    let artifact = world.to_artifact(None);

    let reparsed = artifact
        .to_json()
        .and_then(|json| Ok((WorldMapArtifact::from_json(&json)?.to_json()?, json)));
    results.push(match reparsed {
        Ok((again, json)) => TestResult {
            name: "json_reserialize_identical".into(),
            passed: again == json,
            detail: format!("{} bytes", json.len()),
        },
        Err(e) => TestResult {
            name: "json_reserialize_identical".into(),
            passed: false,
            detail: e.to_string(),
        },
    });

    let sorted = [
        &artifact.world_mask,
        &artifact.roads,
        &artifact.water,
        &artifact.road_adjacent,
    ]
    .into_iter()
    .chain(artifact.districts.values())
    .all(|keys| keys.windows(2).all(|w| w[0] < w[1]));
    results.push(TestResult {
        name: "keys_sorted_unique".into(),
        passed: sorted,
        detail: "tile lists strictly ascending by key".into(),
    });

    results
}
