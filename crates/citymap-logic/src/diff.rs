//! Tile-for-tile comparison of two artifacts.
//!
//! Used to check that independently generated maps (batch export, live
//! renderer dump) agree. Compares tile sets only; timestamps, key order and
//! bounds formatting are ignored since they all follow from the tile sets.

use std::collections::{BTreeSet, HashSet};

use crate::artifact::WorldMapArtifact;

/// Keys present on one side of one layer but not the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerDiff {
    /// `worldMask`, `roads`, `water`, `roadAdjacent` or `districts.<category>`.
    pub layer: String,
    pub only_left: Vec<String>,
    pub only_right: Vec<String>,
}

/// Differences between two artifacts. Only differing layers are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactDiff {
    /// `((cols, rows), (cols, rows))` when grid sizes differ.
    pub grid_mismatch: Option<((u32, u32), (u32, u32))>,
    pub layers: Vec<LayerDiff>,
}

impl ArtifactDiff {
    pub fn is_identical(&self) -> bool {
        self.grid_mismatch.is_none() && self.layers.is_empty()
    }

    /// Total keys that appear on only one side, across all layers.
    pub fn differing_keys(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.only_left.len() + l.only_right.len())
            .sum()
    }
}

fn diff_layer(layer: &str, left: &[String], right: &[String]) -> Option<LayerDiff> {
    let l: HashSet<&String> = left.iter().collect();
    let r: HashSet<&String> = right.iter().collect();
    let only = |a: &HashSet<&String>, b: &HashSet<&String>| -> Vec<String> {
        a.difference(b)
            .map(|s| (*s).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };
    let only_left = only(&l, &r);
    let only_right = only(&r, &l);
    if only_left.is_empty() && only_right.is_empty() {
        return None;
    }
    Some(LayerDiff {
        layer: layer.to_string(),
        only_left,
        only_right,
    })
}

/// Compare two artifacts as tile sets.
pub fn diff_artifacts(left: &WorldMapArtifact, right: &WorldMapArtifact) -> ArtifactDiff {
    let mut diff = ArtifactDiff::default();

    let lg = (left.grid_cols, left.grid_rows);
    let rg = (right.grid_cols, right.grid_rows);
    if lg != rg {
        diff.grid_mismatch = Some((lg, rg));
    }

    let layers: [(&str, &Vec<String>, &Vec<String>); 4] = [
        ("worldMask", &left.world_mask, &right.world_mask),
        ("roads", &left.roads, &right.roads),
        ("water", &left.water, &right.water),
        ("roadAdjacent", &left.road_adjacent, &right.road_adjacent),
    ];
    diff.layers
        .extend(layers.iter().filter_map(|(name, l, r)| diff_layer(name, l, r)));

    // A category missing on one side counts as zero tiles there.
    let categories: BTreeSet<&String> = left.districts.keys().chain(right.districts.keys()).collect();
    let empty = Vec::new();
    for cat in categories {
        let l = left.districts.get(cat).unwrap_or(&empty);
        let r = right.districts.get(cat).unwrap_or(&empty);
        diff.layers
            .extend(diff_layer(&format!("districts.{}", cat), l, r));
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::generate::generate_world;

    fn artifact() -> WorldMapArtifact {
        generate_world(&WorldConfig::reference())
            .unwrap()
            .to_artifact(None)
    }

    #[test]
    fn test_identical_ignores_timestamp_and_order() {
        let a = artifact();
        let mut b = a.clone();
        b.generated_at = Some("2026-10-16T00:00:00.000Z".into());
        b.roads.reverse();
        let d = diff_artifacts(&a, &b);
        assert!(d.is_identical(), "{:?}", d);
        assert_eq!(d.differing_keys(), 0);
    }

    #[test]
    fn test_reports_moved_tile() {
        let a = artifact();
        let mut b = a.clone();
        let moved = b.roads.pop().unwrap();
        b.districts.get_mut("code").unwrap().push(moved.clone());

        let d = diff_artifacts(&a, &b);
        assert!(!d.is_identical());
        assert_eq!(d.layers.len(), 2);
        assert_eq!(d.layers[0].layer, "roads");
        assert_eq!(d.layers[0].only_left, vec![moved.clone()]);
        assert_eq!(d.layers[1].layer, "districts.code");
        assert_eq!(d.layers[1].only_right, vec![moved]);
        assert_eq!(d.differing_keys(), 2);
    }

    #[test]
    fn test_missing_category_is_empty() {
        let a = artifact();
        let mut b = a.clone();
        b.districts.insert("harbour".into(), Vec::new());
        assert!(diff_artifacts(&a, &b).is_identical());
    }

    #[test]
    fn test_grid_mismatch() {
        let a = artifact();
        let mut b = a.clone();
        b.grid_cols = 64;
        let d = diff_artifacts(&a, &b);
        assert_eq!(d.grid_mismatch, Some(((56, 56), (64, 56))));
        assert!(!d.is_identical());
    }
}
