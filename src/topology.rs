//! Zone classification and movement rules for the Main / Bridge / PAB layout.
//!
//! The world is one rectangle, but only three regions of it are real: Main on
//! the left (every row), a single-row bridge in the middle, and the PAB
//! building on the right (a row-offset block). Main and PAB never touch
//! directly; every crossing goes through the bridge entrances.

use crate::constants::*;
use crate::grid::*;
use crate::location::*;
use fnv::FnvHashSet;
use itertools::iproduct;
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};

/// Neighbor offsets for 4-directional movement. Order is significant: search
/// strategies break ties between equally scored neighbors in this order.
pub const NEIGHBORS_4: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Main,
    Bridge,
    Pab,
    Invalid,
}

/// Widths of the three zones. Heights and row offsets are fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldGeometry {
    main_width: u8,
    bridge_length: u8,
    pab_width: u8,
}

impl WorldGeometry {
    pub fn new(main_width: u8, bridge_length: u8, pab_width: u8) -> Self {
        WorldGeometry {
            main_width,
            bridge_length,
            pab_width,
        }
    }

    #[inline]
    pub fn main_width(&self) -> u8 {
        self.main_width
    }

    #[inline]
    pub fn bridge_length(&self) -> u8 {
        self.bridge_length
    }

    #[inline]
    pub fn pab_width(&self) -> u8 {
        self.pab_width
    }

    /// Total columns: Main + Bridge + PAB.
    pub fn width(&self) -> u8 {
        self.main_width + self.bridge_length + self.pab_width
    }

    pub fn height(&self) -> u8 {
        WORLD_HEIGHT
    }

    /// First world column of the PAB building.
    pub fn pab_x0(&self) -> u8 {
        self.main_width + self.bridge_length
    }

    /// The Main tile that touches the bridge.
    pub fn main_entrance(&self) -> Location {
        Location::from_xy(self.main_width - 1, BRIDGE_ROW)
    }

    /// The PAB tile that touches the bridge.
    pub fn pab_entrance(&self) -> Location {
        Location::from_xy(self.pab_x0(), BRIDGE_ROW)
    }

    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x() < self.width() && loc.y() < self.height()
    }

    pub fn zone_of(&self, loc: Location) -> Zone {
        let (x, y) = (loc.x(), loc.y());
        if y >= self.height() {
            return Zone::Invalid;
        }
        if x < self.main_width {
            Zone::Main
        } else if x < self.pab_x0() {
            if y == BRIDGE_ROW {
                Zone::Bridge
            } else {
                Zone::Invalid
            }
        } else if x < self.width() && (PAB_ROW_OFFSET..PAB_ROW_OFFSET + PAB_HEIGHT).contains(&y) {
            Zone::Pab
        } else {
            Zone::Invalid
        }
    }

    /// Main tiles, column-major.
    pub fn main_cells(&self) -> impl Iterator<Item = Location> {
        iproduct!(0..self.main_width, 0..WORLD_HEIGHT).map(|(x, y)| Location::from_xy(x, y))
    }

    /// PAB tiles in world coordinates, column-major.
    pub fn pab_cells(&self) -> impl Iterator<Item = Location> {
        let x0 = self.pab_x0();
        iproduct!(0..self.pab_width, 0..PAB_HEIGHT)
            .map(move |(px, py)| Location::from_xy(x0 + px, PAB_ROW_OFFSET + py))
    }

    pub fn bridge_cells(&self) -> impl Iterator<Item = Location> {
        (self.main_width..self.pab_x0()).map(|x| Location::from_xy(x, BRIDGE_ROW))
    }
}

/// Whether a single step from `from` to the adjacent tile `to` respects the
/// zone-crossing rules. Does not look at cell contents.
pub fn is_legal_transition(geometry: &WorldGeometry, from: Location, to: Location) -> bool {
    match (geometry.zone_of(from), geometry.zone_of(to)) {
        (Zone::Invalid, _) | (_, Zone::Invalid) => false,
        (Zone::Main, Zone::Main) | (Zone::Pab, Zone::Pab) => true,
        (Zone::Bridge, _) => true,
        (Zone::Main, Zone::Bridge) => from == geometry.main_entrance(),
        (Zone::Pab, Zone::Bridge) => from == geometry.pab_entrance(),
        (Zone::Main, Zone::Pab) | (Zone::Pab, Zone::Main) => false,
    }
}

/// Tiles reachable from `pos` in one step: in-bounds, not a wall, and allowed
/// by the zone rules. Returned in `NEIGHBORS_4` order.
pub fn legal_moves(grid: &WorldGrid, pos: Location) -> Vec<Location> {
    let geometry = grid.geometry();
    if geometry.zone_of(pos) == Zone::Invalid {
        return Vec::new();
    }

    NEIGHBORS_4
        .iter()
        .filter_map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|&next| {
            geometry.in_bounds(next)
                && !grid.is_wall(next)
                && is_legal_transition(geometry, pos, next)
        })
        .collect()
}

/// BFS over legal moves from `origin`, never entering tiles whose kind is in
/// `blocked`. The origin itself is always included.
pub fn reachable_from(grid: &WorldGrid, origin: Location, blocked: CellMask) -> FnvHashSet<Location> {
    bfs_reach(origin, move |&loc| {
        legal_moves(grid, loc)
            .into_iter()
            .filter(move |&next| !grid.cell(next).is_in(blocked))
    })
    .collect()
}
