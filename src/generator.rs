//! Rejection-sampling world generator.
//!
//! Each attempt paints the bridge, picks a start, keeps a two-row corridor in
//! front of it free of obstacles, scatters walls and hazards, and places the
//! office and chair in PAB. The attempt is only accepted once a BFS proves the
//! start can reach both the bridge and the office without touching walls,
//! hazards or the chair. Attempts that fail any rule are counted per reason.

use crate::config::WorldConfig;
use crate::error::GenerationError;
use crate::grid::*;
use crate::location::*;
use crate::placement::*;
use crate::topology::*;
use fnv::FnvHashSet;
use log::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a single generation attempt was thrown away.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RejectReason {
    InsufficientCells,
    EntranceBlocked,
    NoOfficeSite,
    NoChairSite,
    InsufficientHazardSites,
    BridgeUnreachable,
    OfficeUnreachable,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Attempts made, including the successful one.
    pub attempts: u32,
    pub rejections: BTreeMap<RejectReason, u32>,
}

impl GenerationReport {
    fn record(&mut self, reason: RejectReason) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    pub fn rejected(&self, reason: RejectReason) -> u32 {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_rejections(&self) -> u32 {
        self.rejections.values().sum()
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    pub grid: WorldGrid,
    pub placement: Placement,
    /// Seed the world was generated from, drawn at random when none was given.
    pub seed: u64,
    pub report: GenerationReport,
}

/// Build a solvable world. `config` is expected to have been validated.
pub fn build_world(config: &WorldConfig, seed: Option<u64>) -> Result<GeneratedWorld, GenerationError> {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let generator = WorldGenerator::new(config);
    if generator.start_candidates.is_empty() {
        return Err(GenerationError::NoStartCandidates);
    }

    let mut report = GenerationReport::default();

    for attempt in 1..=config.max_attempts {
        report.attempts = attempt;
        match generator.attempt(&mut rng) {
            Ok((grid, placement)) => {
                debug!(
                    "Generated world (seed {}) after {} attempts: start {}, office {}, chair {}",
                    seed, attempt, placement.start, placement.office, placement.chair
                );
                return Ok(GeneratedWorld {
                    grid,
                    placement,
                    seed,
                    report,
                });
            }
            Err(reason) => {
                trace!("Generation attempt {} rejected: {:?}", attempt, reason);
                report.record(reason);
            }
        }
    }

    warn!(
        "World generation (seed {}) exhausted {} attempts: {:?}",
        seed, config.max_attempts, report.rejections
    );

    Err(GenerationError::Exhausted {
        attempts: config.max_attempts,
        report,
    })
}

/// Shuffle the tiles of `pool` not rejected by `exclude` and keep `count`.
fn sample_unique<R, F>(pool: &[Location], count: usize, rng: &mut R, exclude: F) -> Option<Vec<Location>>
where
    R: Rng + ?Sized,
    F: Fn(Location) -> bool,
{
    let mut free: Vec<Location> = pool.iter().copied().filter(|&loc| !exclude(loc)).collect();
    if free.len() < count {
        return None;
    }
    free.shuffle(rng);
    free.truncate(count);
    Some(free)
}

fn touches_obstacle(grid: &WorldGrid, loc: Location) -> bool {
    NEIGHBORS_4.iter().any(|&(dx, dy)| {
        loc.offset(dx, dy)
            .and_then(|next| grid.get(next))
            .map_or(false, |kind| kind.is_in(CellMask::WALL | CellMask::ANGRY))
    })
}

struct WorldGenerator<'a> {
    config: &'a WorldConfig,
    geometry: WorldGeometry,
    main_cells: Vec<Location>,
    pab_cells: Vec<Location>,
    bridge: FnvHashSet<Location>,
    start_candidates: Vec<Location>,
}

impl<'a> WorldGenerator<'a> {
    fn new(config: &'a WorldConfig) -> Self {
        let geometry = config.geometry();
        let main_cells: Vec<Location> = geometry.main_cells().collect();
        let pab_cells: Vec<Location> = geometry.pab_cells().collect();
        let bridge: FnvHashSet<Location> = geometry.bridge_cells().collect();

        let start_candidates = main_cells
            .iter()
            .copied()
            .filter(|&loc| loc != geometry.main_entrance() && loc != geometry.pab_entrance())
            .filter(|loc| !bridge.contains(loc))
            .collect();

        WorldGenerator {
            config,
            geometry,
            main_cells,
            pab_cells,
            bridge,
            start_candidates,
        }
    }

    fn is_bridge_or_entrance(&self, loc: Location) -> bool {
        self.bridge.contains(&loc) || loc == self.geometry.main_entrance() || loc == self.geometry.pab_entrance()
    }

    /// Tiles in front of the start kept free of walls and hazards: the start
    /// row and the row below it (above it on the last row), up to the bridge.
    fn safe_corridor(&self, start: Location) -> FnvHashSet<Location> {
        let height = self.geometry.height();
        let second_row = if start.y() + 1 < height {
            start.y() + 1
        } else {
            start.y().saturating_sub(1)
        };

        (start.x()..self.geometry.main_width())
            .flat_map(|x| [Location::from_xy(x, start.y()), Location::from_xy(x, second_row)])
            .collect()
    }

    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(WorldGrid, Placement), RejectReason> {
        let config = self.config;
        let geometry = self.geometry;
        let main_entrance = geometry.main_entrance();
        let pab_entrance = geometry.pab_entrance();

        let mut grid = WorldGrid::new(geometry);
        for &loc in &self.bridge {
            grid.set(loc, CellKind::Bridge);
        }

        let start = *self
            .start_candidates
            .choose(rng)
            .ok_or(RejectReason::InsufficientCells)?;
        let corridor = self.safe_corridor(start);

        let walls_main = sample_unique(&self.main_cells, config.walls_main as usize, rng, |loc| {
            self.is_bridge_or_entrance(loc) || loc == start || corridor.contains(&loc)
        })
        .ok_or(RejectReason::InsufficientCells)?;
        for &loc in &walls_main {
            grid.set(loc, CellKind::Wall);
        }

        let walls_pab = sample_unique(&self.pab_cells, config.walls_pab as usize, rng, |loc| {
            self.is_bridge_or_entrance(loc)
        })
        .ok_or(RejectReason::InsufficientCells)?;
        for &loc in &walls_pab {
            grid.set(loc, CellKind::Wall);
        }

        if grid.is_wall(main_entrance) || grid.is_wall(pab_entrance) {
            return Err(RejectReason::EntranceBlocked);
        }

        let angry_main = sample_unique(&self.main_cells, config.angry_main as usize, rng, |loc| {
            walls_main.contains(&loc)
                || loc == start
                || self.bridge.contains(&loc)
                || loc == main_entrance
                || corridor.contains(&loc)
        })
        .ok_or(RejectReason::InsufficientHazardSites)?;
        for &loc in &angry_main {
            grid.set(loc, CellKind::Angry);
        }

        let mut pab_candidates: Vec<Location> = self
            .pab_cells
            .iter()
            .copied()
            .filter(|&loc| {
                !walls_pab.contains(&loc)
                    && !self.bridge.contains(&loc)
                    && loc != pab_entrance
                    && loc.x() != pab_entrance.x()
            })
            .collect();
        pab_candidates.shuffle(rng);

        let office = pab_candidates
            .iter()
            .copied()
            .find(|&loc| grid.cell(loc) == CellKind::Empty && !touches_obstacle(&grid, loc))
            .ok_or(RejectReason::NoOfficeSite)?;

        let chair_candidates: Vec<Location> = pab_candidates
            .iter()
            .copied()
            .filter(|&loc| loc != office && grid.cell(loc) == CellKind::Empty)
            .collect();
        let chair = *chair_candidates
            .choose(rng)
            .ok_or(RejectReason::NoChairSite)?;

        let mut hazard_sites: Vec<Location> = pab_candidates
            .iter()
            .copied()
            .filter(|&loc| {
                loc != office
                    && loc != chair
                    && grid.cell(loc) == CellKind::Empty
                    && loc.manhattan_to(office) != 1
            })
            .collect();
        if hazard_sites.len() < config.angry_pab as usize {
            return Err(RejectReason::InsufficientHazardSites);
        }
        hazard_sites.shuffle(rng);
        hazard_sites.truncate(config.angry_pab as usize);

        grid.set(office, CellKind::Office);
        grid.set(chair, CellKind::Chair);
        for &loc in &hazard_sites {
            grid.set(loc, CellKind::Angry);
        }

        let reachable = reachable_from(&grid, start, CellMask::GENERATION_BLOCKERS);
        if !reachable.contains(&main_entrance) {
            return Err(RejectReason::BridgeUnreachable);
        }
        if !reachable.contains(&office) {
            return Err(RejectReason::OfficeUnreachable);
        }

        let placement = Placement {
            start,
            walls_main: walls_main.into_iter().collect(),
            walls_pab: walls_pab.into_iter().collect(),
            angry_main: angry_main.into_iter().collect(),
            angry_pab: hazard_sites.into_iter().collect(),
            chair,
            office,
            bridge: self.bridge.clone(),
        };

        Ok((grid, placement))
    }
}
