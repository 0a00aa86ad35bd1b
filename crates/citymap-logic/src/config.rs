//! World configuration: grid, seeds, and district declarations.
//!
//! A `WorldConfig` is fixed before generation and never changes during a
//! run. [`WorldConfig::reference`] is the configuration both the batch
//! exporter and the live renderer ship with; changing any value in it
//! changes the generated map.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::grid::Grid;
use crate::water::WaterRule;

/// Gap threshold around which road noise varies.
pub const DEFAULT_ROAD_THRESHOLD: f64 = 1.0;

/// The seven independent noise/PRNG streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorldSeeds {
    pub mask_outer: i32,
    pub mask_mid: i32,
    pub mask_fine: i32,
    /// Seeds both the primary shape field and the per-district offset draw.
    pub district_primary: i32,
    pub district_detail: i32,
    pub road_primary: i32,
    pub road_detail: i32,
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self {
            mask_outer: 5555,
            mask_mid: 6666,
            mask_fine: 7777,
            district_primary: 7331,
            district_detail: 4242,
            road_primary: 9999,
            road_detail: 8888,
        }
    }
}

/// One district declaration. Declaration order is significant: it fixes
/// the per-district noise offsets and breaks distance ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DistrictDef {
    pub name: String,
    /// Unique key.
    pub category: String,
    pub seed_col: i32,
    pub seed_row: i32,
    pub noise_amplitude: f64,
    pub noise_frequency: f64,
    /// 0 = fully noisy edge, 1 = noise damped by 30%.
    pub radial_bias: f64,
    /// Multiplier on raw distance; below 1 makes the district larger.
    pub size_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<WaterRule>,
}

/// Everything the generator reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorldConfig {
    pub grid: Grid,
    #[serde(default)]
    pub seeds: WorldSeeds,
    #[serde(default = "default_road_threshold")]
    pub road_threshold: f64,
    pub districts: Vec<DistrictDef>,
}

fn default_road_threshold() -> f64 {
    DEFAULT_ROAD_THRESHOLD
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl WorldConfig {
    /// 56×56 grid, reference seeds, six districts.
    pub fn reference() -> Self {
        Self {
            grid: Grid::new(56, 56),
            seeds: WorldSeeds::default(),
            road_threshold: DEFAULT_ROAD_THRESHOLD,
            districts: reference_districts(),
        }
    }

    /// Index of the district with `category`.
    pub fn district_index(&self, category: &str) -> Option<usize> {
        self.districts.iter().position(|d| d.category == category)
    }
}

/// The six reference districts, in declaration order.
pub fn reference_districts() -> Vec<DistrictDef> {
    #[allow(clippy::too_many_arguments)]
    fn def(
        name: &str,
        category: &str,
        seed: (i32, i32),
        noise_amplitude: f64,
        noise_frequency: f64,
        radial_bias: f64,
        size_weight: f64,
        water: Option<WaterRule>,
    ) -> DistrictDef {
        DistrictDef {
            name: name.to_string(),
            category: category.to_string(),
            seed_col: seed.0,
            seed_row: seed.1,
            noise_amplitude,
            noise_frequency,
            radial_bias,
            size_weight,
            water,
        }
    }

    vec![
        def("Town Square", "townsquare", (28, 28), 2.5, 0.55, 0.7, 0.78, None),
        def(
            "Creative Quarter",
            "creative",
            (19, 19),
            3.5,
            0.60,
            0.45,
            1.0,
            Some(WaterRule::Pond { radius_sq: 0.06 }),
        ),
        def(
            "Translation Ward",
            "translation",
            (34, 17),
            3.2,
            0.65,
            0.25,
            1.0,
            Some(WaterRule::Coast { cutoff: 0.6 }),
        ),
        def("Code Heights", "code", (40, 30), 3.0, 0.55, 0.55, 1.0, None),
        def(
            "Research Fields",
            "research",
            (30, 40),
            3.8,
            0.60,
            0.35,
            1.0,
            Some(WaterRule::Ripples {
                col_freq: 3.7,
                row_freq: 2.3,
                threshold: 0.85,
            }),
        ),
        def(
            "DeFi Docks",
            "defi",
            (17, 34),
            4.5,
            0.70,
            0.15,
            1.0,
            Some(WaterRule::Canal { half_width: 0.05 }),
        ),
    ]
}

// ── Validation ──────────────────────────────────────────────────────────

/// A configuration defect. Any of these stops generation before it starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no districts declared")]
    EmptyDistricts,
    #[error("grid dimensions must be positive, got {cols}x{rows}")]
    ZeroGridDimension { cols: u32, rows: u32 },
    #[error("district #{index} has an empty category")]
    EmptyCategory { index: usize },
    #[error("district category {0:?} is declared more than once")]
    DuplicateCategory(String),
    #[error("{field} of {owner} is not finite")]
    NonFiniteParameter { owner: String, field: &'static str },
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &WorldConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.grid.cols == 0 || config.grid.rows == 0 {
        errors.push(ConfigError::ZeroGridDimension {
            cols: config.grid.cols,
            rows: config.grid.rows,
        });
    }
    if config.districts.is_empty() {
        errors.push(ConfigError::EmptyDistricts);
    }
    if !config.road_threshold.is_finite() {
        errors.push(ConfigError::NonFiniteParameter {
            owner: "world".to_string(),
            field: "roadThreshold",
        });
    }

    let mut seen = HashSet::new();
    for (index, d) in config.districts.iter().enumerate() {
        if d.category.trim().is_empty() {
            errors.push(ConfigError::EmptyCategory { index });
        } else if !seen.insert(d.category.as_str()) {
            errors.push(ConfigError::DuplicateCategory(d.category.clone()));
        }

        let mut params = vec![
            ("noiseAmplitude", d.noise_amplitude),
            ("noiseFrequency", d.noise_frequency),
            ("radialBias", d.radial_bias),
            ("sizeWeight", d.size_weight),
        ];
        if let Some(rule) = &d.water {
            params.extend(rule.parameters());
        }
        for (field, value) in params {
            if !value.is_finite() {
                errors.push(ConfigError::NonFiniteParameter {
                    owner: format!("district {:?}", d.category),
                    field,
                });
            }
        }
    }

    errors
}
