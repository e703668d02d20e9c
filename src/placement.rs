//! The record of every special tile in a generated world.

use crate::grid::*;
use crate::location::*;
use crate::topology::*;
use fnv::{FnvHashMap, FnvHashSet};
use serde::{Deserialize, Serialize};

/// Which placement set a tile came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementCategory {
    Start,
    WallMain,
    WallPab,
    AngryMain,
    AngryPab,
    Chair,
    Office,
    Bridge,
}

impl PlacementCategory {
    /// The zone tiles of this category must lie in.
    pub fn zone(self) -> Zone {
        match self {
            PlacementCategory::Start
            | PlacementCategory::WallMain
            | PlacementCategory::AngryMain => Zone::Main,
            PlacementCategory::WallPab
            | PlacementCategory::AngryPab
            | PlacementCategory::Chair
            | PlacementCategory::Office => Zone::Pab,
            PlacementCategory::Bridge => Zone::Bridge,
        }
    }

    /// Cell kind painted for this category; the start tile stays empty.
    pub fn cell_kind(self) -> CellKind {
        match self {
            PlacementCategory::Start => CellKind::Empty,
            PlacementCategory::WallMain | PlacementCategory::WallPab => CellKind::Wall,
            PlacementCategory::AngryMain | PlacementCategory::AngryPab => CellKind::Angry,
            PlacementCategory::Chair => CellKind::Chair,
            PlacementCategory::Office => CellKind::Office,
            PlacementCategory::Bridge => CellKind::Bridge,
        }
    }
}

/// Immutable description of a world's special tiles, produced alongside the
/// grid by the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub start: Location,
    pub walls_main: FnvHashSet<Location>,
    pub walls_pab: FnvHashSet<Location>,
    pub angry_main: FnvHashSet<Location>,
    pub angry_pab: FnvHashSet<Location>,
    pub chair: Location,
    pub office: Location,
    pub bridge: FnvHashSet<Location>,
}

impl Placement {
    /// Every placed tile tagged with its category.
    pub fn entries(&self) -> impl Iterator<Item = (PlacementCategory, Location)> + '_ {
        fn tagged(
            category: PlacementCategory,
            set: &FnvHashSet<Location>,
        ) -> impl Iterator<Item = (PlacementCategory, Location)> + '_ {
            set.iter().map(move |loc| (category, *loc))
        }

        std::iter::once((PlacementCategory::Start, self.start))
            .chain(tagged(PlacementCategory::WallMain, &self.walls_main))
            .chain(tagged(PlacementCategory::WallPab, &self.walls_pab))
            .chain(tagged(PlacementCategory::AngryMain, &self.angry_main))
            .chain(tagged(PlacementCategory::AngryPab, &self.angry_pab))
            .chain(std::iter::once((PlacementCategory::Chair, self.chair)))
            .chain(std::iter::once((PlacementCategory::Office, self.office)))
            .chain(tagged(PlacementCategory::Bridge, &self.bridge))
    }

    /// Tiles claimed by more than one category.
    pub fn overlaps(&self) -> Vec<Location> {
        let mut seen: FnvHashMap<Location, usize> = FnvHashMap::default();
        for (_, loc) in self.entries() {
            *seen.entry(loc).or_default() += 1;
        }
        let mut shared: Vec<Location> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(loc, _)| loc)
            .collect();
        shared.sort();
        shared
    }

    pub fn is_disjoint(&self) -> bool {
        self.overlaps().is_empty()
    }

    /// True when every tile lies inside the zone its category belongs to.
    pub fn respects_zones(&self, geometry: &WorldGeometry) -> bool {
        self.entries()
            .all(|(category, loc)| geometry.zone_of(loc) == category.zone())
    }

    pub fn wall_count(&self) -> usize {
        self.walls_main.len() + self.walls_pab.len()
    }
}

impl WorldGrid {
    /// Paint a placement onto an empty grid of the given geometry.
    pub fn from_placement(geometry: WorldGeometry, placement: &Placement) -> WorldGrid {
        let mut grid = WorldGrid::new(geometry);
        for (category, loc) in placement.entries() {
            grid.set(loc, category.cell_kind());
        }
        grid
    }
}
