use crate::error::PathError;
use crate::grid::*;
use crate::location::*;
use crate::topology::*;
use log::*;
use serde::Serialize;

/// A validated walk: begins at the start tile, every step is a legal move and
/// no tile is a wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AgentPath {
    tiles: Vec<Location>,
}

impl AgentPath {
    /// Check `raw` against the movement rules of `grid`.
    pub fn validate(grid: &WorldGrid, start: Location, raw: &[Location]) -> Result<(), PathError> {
        let first = *raw.first().ok_or(PathError::Empty)?;
        if first != start {
            return Err(PathError::WrongStart {
                expected: start,
                found: first,
            });
        }

        for (index, &at) in raw.iter().enumerate() {
            if grid.is_wall(at) {
                return Err(PathError::OntoWall { index, at });
            }
            if index > 0 {
                let from = raw[index - 1];
                if !legal_moves(grid, from).contains(&at) {
                    return Err(PathError::IllegalStep {
                        index,
                        from,
                        to: at,
                    });
                }
            }
        }

        Ok(())
    }

    pub fn new(grid: &WorldGrid, start: Location, raw: Vec<Location>) -> Result<Self, PathError> {
        Self::validate(grid, start, &raw)?;
        Ok(AgentPath { tiles: raw })
    }

    /// The path that never leaves the start tile.
    pub fn stationary(start: Location) -> Self {
        AgentPath { tiles: vec![start] }
    }

    /// Accept `raw` when valid, otherwise fall back to the stationary path.
    pub fn sanitize(grid: &WorldGrid, start: Location, raw: Vec<Location>) -> Self {
        match Self::new(grid, start, raw) {
            Ok(path) => path,
            Err(err) => {
                warn!("Discarding invalid path ({}), agent stays at {}", err, start);
                Self::stationary(start)
            }
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Location] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Final tile of the walk.
    pub fn end(&self) -> Option<Location> {
        self.tiles.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> WorldGrid {
        let mut grid = WorldGrid::new(WorldGeometry::new(10, 3, 7));
        grid.set(Location::from_xy(2, 0), CellKind::Wall);
        grid
    }

    fn start() -> Location {
        Location::from_xy(0, 0)
    }

    #[test]
    fn valid_path_is_kept() {
        let raw = vec![start(), Location::from_xy(1, 0), Location::from_xy(1, 1)];
        let path = AgentPath::sanitize(&grid(), start(), raw.clone());
        assert_eq!(path.as_slice(), &raw[..]);
        assert_eq!(path.end(), Some(Location::from_xy(1, 1)));
    }

    #[test]
    fn each_defect_is_reported() {
        let g = grid();
        assert_eq!(AgentPath::validate(&g, start(), &[]), Err(PathError::Empty));
        assert_eq!(
            AgentPath::validate(&g, start(), &[Location::from_xy(1, 0)]),
            Err(PathError::WrongStart {
                expected: start(),
                found: Location::from_xy(1, 0)
            })
        );
        assert_eq!(
            AgentPath::validate(&g, start(), &[start(), Location::from_xy(1, 1)]),
            Err(PathError::IllegalStep {
                index: 1,
                from: start(),
                to: Location::from_xy(1, 1)
            })
        );
        assert_eq!(
            AgentPath::validate(
                &g,
                start(),
                &[start(), Location::from_xy(1, 0), Location::from_xy(2, 0)]
            ),
            Err(PathError::OntoWall {
                index: 2,
                at: Location::from_xy(2, 0)
            })
        );
    }

    #[test]
    fn invalid_paths_collapse_to_start() {
        let path = AgentPath::sanitize(&grid(), start(), vec![Location::from_xy(5, 5)]);
        assert_eq!(path, AgentPath::stationary(start()));
        let path = AgentPath::sanitize(&grid(), start(), Vec::new());
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn zone_jumps_are_illegal() {
        let g = WorldGrid::new(WorldGeometry::new(10, 3, 7));
        let from = Location::from_xy(9, 4);
        let raw = [from, Location::from_xy(10, 4)];
        assert!(matches!(
            AgentPath::validate(&g, from, &raw),
            Err(PathError::IllegalStep { index: 1, .. })
        ));
    }
}
