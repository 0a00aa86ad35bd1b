//! The generation pipeline.
//!
//! mask → assignment → bounds → water → adjacency, each stage consuming the
//! previous stage's complete output. The whole run is a pure function of
//! the [`WorldConfig`]; nothing is cached between runs.

use thiserror::Error;

use crate::adjacency::compute_road_adjacency;
use crate::bounds::compute_bounds;
use crate::config::{validate_config, ConfigError, WorldConfig};
use crate::districts::{assign_districts, GenerationContext};
use crate::mask::generate_world_mask;
use crate::noise::NoiseError;
use crate::water::classify_water;
use crate::world::WorldMap;

/// Why a run could not start.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid world config: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
    #[error(transparent)]
    Noise(#[from] NoiseError),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `config` and run every stage over the full grid.
pub fn generate_world(config: &WorldConfig) -> Result<WorldMap, GenerateError> {
    let errors = validate_config(config);
    if !errors.is_empty() {
        return Err(GenerateError::InvalidConfig(errors));
    }

    let mask = generate_world_mask(config.grid, &config.seeds)?;
    log::debug!("world mask: {} habitable tiles", mask.len());

    let ctx = GenerationContext::new(config)?;
    let assignment = assign_districts(&mask, &ctx);
    log::debug!("assignment: {} road tiles", assignment.roads().len());

    let bounds = compute_bounds(&assignment);
    let water = classify_water(&assignment, &ctx, &bounds);
    log::debug!("water: {} tiles", water.count());

    let adjacency = compute_road_adjacency(&assignment);
    log::debug!("road adjacency: {} tiles", adjacency.count());

    let world = WorldMap::assemble(
        ctx.districts().to_vec(),
        assignment,
        bounds,
        &water,
        &adjacency,
    );

    let per_district = world
        .districts()
        .iter()
        .map(|d| format!("{}={}", d.category, world.district_tiles(&d.category).len()))
        .collect::<Vec<_>>()
        .join(" ");
    log::info!(
        "Generated {}x{} world: {} habitable, {} road, {} water, {} road-adjacent [{}]",
        config.grid.cols,
        config.grid.rows,
        mask.len(),
        world.road_count(),
        water.count(),
        adjacency.count(),
        per_district
    );

    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_invalid_config_reports_every_error() {
        let mut config = WorldConfig::reference();
        config.grid = Grid::new(0, 0);
        config.districts.clear();
        let err = generate_world(&config).unwrap_err();
        match &err {
            GenerateError::InvalidConfig(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("no districts declared"));
        assert!(msg.contains("0x0"));
    }

    #[test]
    fn test_runs_are_identical() {
        let config = WorldConfig::reference();
        let a = generate_world(&config).unwrap();
        let b = generate_world(&config).unwrap();
        assert_eq!(a, b);
    }
}
