//! District assignment and road carving.
//!
//! Every habitable cell measures a noise-perturbed distance to each
//! district seed. The nearest district claims the cell unless the runner-up
//! is almost as close, in which case the cell becomes road. Roads therefore
//! trace the contested borders between districts, with their width wobbled
//! by two more noise fields.
//!
//! All per-run state (the district list, noise fields, and the per-district
//! offsets drawn at start-up) lives in a [`GenerationContext`] built fresh
//! for each run, so districts and offsets can never disagree in length.

use crate::config::{DistrictDef, WorldConfig};
use crate::grid::{TileCoord, TileGrid};
use crate::mask::WorldMask;
use crate::noise::{NoiseError, ValueNoise2D};
use crate::rng::SeededRng;

const SHAPE_LATTICE: usize = 32;
const SHAPE_DETAIL_LATTICE: usize = 48;
const ROAD_LATTICE: usize = 24;
const ROAD_DETAIL_LATTICE: usize = 36;

/// Offsets are drawn in `[0, OFFSET_RANGE)` on each axis.
const OFFSET_RANGE: f64 = 100.0;

/// Classification of one cell after assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Void,
    Road,
    /// Index into the declared district list.
    District(usize),
}

/// Where a district samples the shared shape fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseOffset {
    pub ox: f64,
    pub oy: f64,
}

/// Per-run generation state.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    districts: Vec<DistrictDef>,
    shape: ValueNoise2D,
    shape_detail: ValueNoise2D,
    road: ValueNoise2D,
    road_detail: ValueNoise2D,
    offsets: Vec<NoiseOffset>,
    road_threshold: f64,
}

impl GenerationContext {
    /// Build fields and draw one offset pair per district, in declaration
    /// order, from a PRNG seeded with `district_primary`.
    pub fn new(config: &WorldConfig) -> Result<Self, NoiseError> {
        let seeds = &config.seeds;
        let mut rng = SeededRng::new(seeds.district_primary);
        let offsets = config
            .districts
            .iter()
            .map(|_| {
                let ox = rng.next_f64() * OFFSET_RANGE;
                let oy = rng.next_f64() * OFFSET_RANGE;
                NoiseOffset { ox, oy }
            })
            .collect();

        Ok(Self {
            districts: config.districts.clone(),
            shape: ValueNoise2D::new(SHAPE_LATTICE, seeds.district_primary)?,
            shape_detail: ValueNoise2D::new(SHAPE_DETAIL_LATTICE, seeds.district_detail)?,
            road: ValueNoise2D::new(ROAD_LATTICE, seeds.road_primary)?,
            road_detail: ValueNoise2D::new(ROAD_DETAIL_LATTICE, seeds.road_detail)?,
            offsets,
            road_threshold: config.road_threshold,
        })
    }

    /// Districts in declaration order.
    pub fn districts(&self) -> &[DistrictDef] {
        &self.districts
    }

    /// Per-district offsets, indexed like [`districts`](Self::districts).
    pub fn offsets(&self) -> &[NoiseOffset] {
        &self.offsets
    }

    /// Perturbed distance from `coord` to district `index`; `None` for an
    /// index past the declared districts.
    pub fn perturbed_distance(&self, index: usize, coord: TileCoord) -> Option<f64> {
        let district = self.districts.get(index)?;
        let offset = *self.offsets.get(index)?;
        Some(self.distance_to(district, offset, coord))
    }

    /// Weighted Euclidean distance from the district seed plus a two-octave
    /// noise term, damped by the district's radial bias.
    fn distance_to(&self, district: &DistrictDef, offset: NoiseOffset, coord: TileCoord) -> f64 {
        let col = f64::from(coord.col);
        let row = f64::from(coord.row);
        let dx = col - f64::from(district.seed_col);
        let dy = row - f64::from(district.seed_row);
        let base = (dx * dx + dy * dy).sqrt() * district.size_weight;

        let NoiseOffset { ox, oy } = offset;
        let freq = district.noise_frequency;
        let n_sample = self.shape.sample(col * freq + ox, row * freq + oy);
        let n_detail = self
            .shape_detail
            .sample(col * freq * 2.5 + ox + 50.0, row * freq * 2.5 + oy + 50.0);
        let combined = n_sample * 0.65 + n_detail * 0.35;
        let noise_term =
            (combined - 0.5) * district.noise_amplitude * (1.0 - district.radial_bias * 0.3);

        base + noise_term
    }

    /// Minimum nearest/runner-up gap for a cell to stay district land.
    pub fn road_threshold_at(&self, coord: TileCoord) -> f64 {
        let col = f64::from(coord.col);
        let row = f64::from(coord.row);
        let rn1 = self.road.sample(col * 0.3 + 50.0, row * 0.3 + 50.0);
        let rn2 = self.road_detail.sample(col * 0.7 + 80.0, row * 0.7 + 80.0);
        let rn = rn1 * 0.6 + rn2 * 0.4;
        self.road_threshold + (rn - 0.5) * 0.4
    }
}

/// Result of assignment: per-cell kinds plus per-district member lists.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictAssignment {
    kinds: TileGrid<TileKind>,
    members: Vec<Vec<TileCoord>>,
    roads: Vec<TileCoord>,
}

impl DistrictAssignment {
    /// Per-cell classification; doubles as the tile → district lookup.
    pub fn kinds(&self) -> &TileGrid<TileKind> {
        &self.kinds
    }

    /// Member tiles per district (row-major), indexed like the district list.
    pub fn members(&self) -> &[Vec<TileCoord>] {
        &self.members
    }

    /// Road tiles, row-major.
    pub fn roads(&self) -> &[TileCoord] {
        &self.roads
    }

    pub fn kind_at(&self, coord: TileCoord) -> TileKind {
        self.kinds.get(coord).copied().unwrap_or(TileKind::Void)
    }

    pub(crate) fn into_parts(self) -> (TileGrid<TileKind>, Vec<Vec<TileCoord>>, Vec<TileCoord>) {
        (self.kinds, self.members, self.roads)
    }

    /// Reassemble from parts without checking they agree.
    #[cfg(test)]
    pub(crate) fn from_parts(
        kinds: TileGrid<TileKind>,
        members: Vec<Vec<TileCoord>>,
        roads: Vec<TileCoord>,
    ) -> Self {
        Self {
            kinds,
            members,
            roads,
        }
    }
}

/// Assign every habitable cell to a district or to the road network.
///
/// Districts are ranked with a stable sort, so on an exact distance tie the
/// earlier-declared district wins. With a single district there is no
/// runner-up and no roads form. With no districts every cell stays void.
pub fn assign_districts(mask: &WorldMask, ctx: &GenerationContext) -> DistrictAssignment {
    let mut members = vec![Vec::new(); ctx.districts.len()];
    let mut roads = Vec::new();
    let mut ranked: Vec<(f64, usize)> = Vec::with_capacity(ctx.districts.len());

    let kinds = mask.cells().map(|coord, &habitable| {
        if !habitable {
            return TileKind::Void;
        }
        ranked.clear();
        ranked.extend(
            ctx.districts
                .iter()
                .zip(&ctx.offsets)
                .enumerate()
                .map(|(i, (d, &offset))| (ctx.distance_to(d, offset, coord), i)),
        );
        ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let Some(&(nearest_dist, nearest)) = ranked.first() else {
            return TileKind::Void;
        };
        let gap = ranked
            .get(1)
            .map_or(f64::INFINITY, |&(second_dist, _)| second_dist - nearest_dist);

        if gap < ctx.road_threshold_at(coord) {
            roads.push(coord);
            TileKind::Road
        } else {
            members[nearest].push(coord);
            TileKind::District(nearest)
        }
    });

    DistrictAssignment {
        kinds,
        members,
        roads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::mask::generate_world_mask;

    fn reference() -> (WorldConfig, WorldMask, GenerationContext) {
        let config = WorldConfig::reference();
        let mask = generate_world_mask(config.grid, &config.seeds).unwrap();
        let ctx = GenerationContext::new(&config).unwrap();
        (config, mask, ctx)
    }

    #[test]
    fn test_offsets_follow_declaration_order() {
        let (config, _, ctx) = reference();
        assert_eq!(ctx.offsets().len(), config.districts.len());
        let first = ctx.offsets()[0];
        assert_eq!(first.ox, 0.9737386852502823 * 100.0);
        assert_eq!(first.oy, 0.6532226775307208 * 100.0);
    }

    #[test]
    fn test_context_owns_its_districts() {
        let mut config = WorldConfig::reference();
        config.districts.truncate(2);
        let mask = generate_world_mask(config.grid, &config.seeds).unwrap();
        let ctx = GenerationContext::new(&config).unwrap();
        assert_eq!(ctx.districts(), &config.districts[..]);
        assert_eq!(ctx.offsets().len(), 2);

        let a = assign_districts(&mask, &ctx);
        assert_eq!(a.members().len(), 2);
        let centre = TileCoord::new(28, 28);
        assert!(ctx.perturbed_distance(1, centre).is_some());
        assert_eq!(ctx.perturbed_distance(2, centre), None);
    }

    #[test]
    fn test_perturbed_distance_at_seed() {
        let (config, _, ctx) = reference();
        let town = &config.districts[0];
        let seed = TileCoord::new(town.seed_col as u32, town.seed_row as u32);
        let d = ctx.perturbed_distance(0, seed).unwrap();
        // zero base distance leaves only the damped noise term
        let bound = 0.5 * town.noise_amplitude * (1.0 - town.radial_bias * 0.3);
        assert!(d.abs() <= bound, "distance {} beyond noise bound {}", d, bound);
    }

    #[test]
    fn test_reference_counts() {
        let (config, mask, ctx) = reference();
        let a = assign_districts(&mask, &ctx);
        let counts: Vec<usize> = a.members().iter().map(Vec::len).collect();
        assert_eq!(counts, vec![147, 498, 515, 433, 446, 513]);
        assert_eq!(a.roads().len(), 262);
    }

    #[test]
    fn test_partition_of_mask() {
        let (config, mask, ctx) = reference();
        let a = assign_districts(&mask, &ctx);
        let assigned: usize = a.members().iter().map(Vec::len).sum::<usize>() + a.roads().len();
        assert_eq!(assigned, mask.len());
        for (coord, kind) in a.kinds().iter() {
            assert_eq!(*kind == TileKind::Void, !mask.contains(coord));
        }
    }

    #[test]
    fn test_single_district_forms_no_roads() {
        let mut config = WorldConfig::reference();
        config.districts.truncate(1);
        let mask = generate_world_mask(config.grid, &config.seeds).unwrap();
        let ctx = GenerationContext::new(&config).unwrap();
        let a = assign_districts(&mask, &ctx);
        assert!(a.roads().is_empty());
        assert_eq!(a.members()[0].len(), mask.len());
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        // Two identical districts: perturbed distances differ only through
        // the offsets, so clone the context offsets to force exact ties.
        let mut config = WorldConfig::reference();
        let mut twin = config.districts[0].clone();
        twin.category = "twin".into();
        config.districts = vec![config.districts[0].clone(), twin];
        let mask = generate_world_mask(config.grid, &config.seeds).unwrap();
        let mut ctx = GenerationContext::new(&config).unwrap();
        ctx.offsets[1] = ctx.offsets[0];
        config.road_threshold = -10.0;
        ctx.road_threshold = config.road_threshold;

        let a = assign_districts(&mask, &ctx);
        assert!(a.roads().is_empty());
        assert!(a.members()[1].is_empty());
        assert_eq!(a.members()[0].len(), mask.len());
    }

    #[test]
    fn test_no_districts_leaves_mask_void() {
        let mut config = WorldConfig::reference();
        config.districts.clear();
        let mask = generate_world_mask(config.grid, &config.seeds).unwrap();
        let ctx = GenerationContext::new(&config).unwrap();
        let a = assign_districts(&mask, &ctx);
        assert!(a.members().is_empty());
        assert!(a.roads().is_empty());
        assert!(a.kinds().iter().all(|(_, k)| *k == TileKind::Void));
    }

    #[test]
    fn test_road_threshold_band() {
        let (_, mask, ctx) = reference();
        for coord in mask.iter().step_by(17) {
            let t = ctx.road_threshold_at(coord);
            assert!((0.8..=1.2).contains(&t), "threshold {} at {}", t, coord);
        }
    }
}
