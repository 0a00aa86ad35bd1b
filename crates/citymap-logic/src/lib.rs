//! Deterministic district map generation.
//!
//! Derives a grid world (habitable land, roads, district territories,
//! water, road frontage) from a handful of integer seeds and district
//! declarations. The output is a pure function of the [`config::WorldConfig`]:
//! the batch exporter and any live renderer linking this crate produce the
//! same map tile for tile, with no shared runtime state.
//!
//! No rendering, networking, or filesystem access lives here.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`rng`] | mulberry32 seeded PRNG (also a `rand::RngCore`) |
//! | [`noise`] | Lattice value noise with smoothstep interpolation |
//! | [`grid`] | Grid dimensions, `"col,row"` keys, dense per-tile storage |
//! | [`config`] | Seeds, district declarations, reference config, validation |
//! | [`mask`] | Noisy isometric ellipse selecting habitable cells |
//! | [`districts`] | Perturbed-distance district assignment and road carving |
//! | [`bounds`] | Per-district bounding box and centroid |
//! | [`water`] | Per-district water rules |
//! | [`adjacency`] | Road frontage flags |
//! | [`world`] | The classified map and its queries |
//! | [`generate`] | Pipeline: mask → districts → bounds → water → adjacency |
//! | [`artifact`] | JSON artifact (de)serialization |
//! | [`diff`] | Tile-for-tile artifact comparison |
//! | [`validate`] | Structural checks over a generated map |

pub mod adjacency;
pub mod artifact;
pub mod bounds;
pub mod config;
pub mod diff;
pub mod districts;
pub mod generate;
pub mod grid;
pub mod mask;
pub mod noise;
pub mod rng;
pub mod validate;
pub mod water;
pub mod world;

pub use artifact::WorldMapArtifact;
pub use config::WorldConfig;
pub use generate::{generate_world, GenerateError};
pub use world::WorldMap;
