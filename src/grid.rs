use crate::location::*;
use crate::topology::WorldGeometry;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Contents of a single world tile.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty = 0,
    Wall = 1,
    Bridge = 2,
    Angry = 3,
    Chair = 4,
    Office = 5,
}

bitflags! {
    /// A set of cell kinds, used to describe what a traversal may not enter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellMask: u8 {
        const EMPTY = 1;
        const WALL = 2;
        const BRIDGE = 4;
        const ANGRY = 8;
        const CHAIR = 16;
        const OFFICE = 32;
    }
}

impl CellMask {
    /// Agents are only ever stopped by walls.
    pub const MOVEMENT_BLOCKERS: CellMask = CellMask::WALL;

    /// World generation proves solvability while also steering clear of
    /// hazards and the chair.
    pub const GENERATION_BLOCKERS: CellMask = CellMask::WALL
        .union(CellMask::CHAIR)
        .union(CellMask::ANGRY);
}

impl CellKind {
    pub fn mask(self) -> CellMask {
        match self {
            CellKind::Empty => CellMask::EMPTY,
            CellKind::Wall => CellMask::WALL,
            CellKind::Bridge => CellMask::BRIDGE,
            CellKind::Angry => CellMask::ANGRY,
            CellKind::Chair => CellMask::CHAIR,
            CellKind::Office => CellMask::OFFICE,
        }
    }

    #[inline]
    pub fn is_in(self, mask: CellMask) -> bool {
        mask.intersects(self.mask())
    }
}

/// Row-major storage for per-tile data of an arbitrary rectangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridArray<T: Copy> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> GridArray<T> {
    pub fn new(width: usize, height: usize, initial: T) -> Self {
        GridArray {
            width,
            height,
            data: vec![initial; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        let index = y * self.width + x;
        &self.data[index]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let index = y * self.width + x;
        &mut self.data[index]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        *self.get_mut(x, y) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(i, v)| {
            let x = i % width;
            let y = i / width;
            ((x, y), v)
        })
    }
}

/// The composite Main + Bridge + PAB world. Built once by the generator and
/// only read afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    geometry: WorldGeometry,
    cells: GridArray<CellKind>,
}

impl WorldGrid {
    /// An all-empty grid for the given geometry.
    pub fn new(geometry: WorldGeometry) -> Self {
        WorldGrid {
            cells: GridArray::new(
                geometry.width() as usize,
                geometry.height() as usize,
                CellKind::Empty,
            ),
            geometry,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &WorldGeometry {
        &self.geometry
    }

    /// Cell at an in-bounds location. Panics when out of bounds.
    #[inline]
    pub fn cell(&self, loc: Location) -> CellKind {
        *self.cells.get(loc.x() as usize, loc.y() as usize)
    }

    pub fn get(&self, loc: Location) -> Option<CellKind> {
        if self.geometry.in_bounds(loc) {
            Some(self.cell(loc))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_wall(&self, loc: Location) -> bool {
        self.get(loc) == Some(CellKind::Wall)
    }

    pub fn set(&mut self, loc: Location, kind: CellKind) {
        self.cells.set(loc.x() as usize, loc.y() as usize, kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, CellKind)> + '_ {
        self.cells
            .iter()
            .map(|((x, y), kind)| (Location::from_coords(x as u32, y as u32), *kind))
    }
}
