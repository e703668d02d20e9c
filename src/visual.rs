use super::grid::*;
use super::location::*;
use super::placement::*;
use super::topology::*;

/// What a renderer is asked to draw at one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Outside every zone.
    Void,
    Cell(CellKind),
    Start,
}

impl Tile {
    pub fn glyph(self) -> char {
        match self {
            Tile::Void => ' ',
            Tile::Start => 'S',
            Tile::Cell(CellKind::Empty) => '.',
            Tile::Cell(CellKind::Wall) => '#',
            Tile::Cell(CellKind::Bridge) => '=',
            Tile::Cell(CellKind::Angry) => 'A',
            Tile::Cell(CellKind::Chair) => 'P',
            Tile::Cell(CellKind::Office) => 'O',
        }
    }
}

pub trait GridVisualizer {
    /// Called once per row, highest row first, before its tiles.
    fn begin_row(&mut self, y: u8);

    fn render(&mut self, location: Location, tile: Tile);
}

/// Feed every tile of `grid` to `visualizer`, rows top-down.
pub fn visit_tiles<V: GridVisualizer>(grid: &WorldGrid, placement: &Placement, visualizer: &mut V) {
    let geometry = grid.geometry();
    for y in (0..geometry.height()).rev() {
        visualizer.begin_row(y);
        for x in 0..geometry.width() {
            let location = Location::from_xy(x, y);
            let tile = if location == placement.start {
                Tile::Start
            } else if geometry.zone_of(location) == Zone::Invalid {
                Tile::Void
            } else {
                Tile::Cell(grid.cell(location))
            };
            visualizer.render(location, tile);
        }
    }
}

#[derive(Default)]
struct AsciiCanvas {
    rows: Vec<Vec<char>>,
}

impl GridVisualizer for AsciiCanvas {
    fn begin_row(&mut self, _y: u8) {
        self.rows.push(Vec::new());
    }

    fn render(&mut self, _location: Location, tile: Tile) {
        if let Some(row) = self.rows.last_mut() {
            row.push(tile.glyph());
        }
    }
}

/// Space-separated glyphs, one line per row, the top row first.
pub fn render_ascii(grid: &WorldGrid, placement: &Placement) -> String {
    let mut canvas = AsciiCanvas::default();
    visit_tiles(grid, placement, &mut canvas);

    canvas
        .rows
        .iter()
        .map(|row| {
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            line.join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_draws_zones_and_overlays_start() {
        let geometry = WorldGeometry::new(7, 1, 4);
        let placement = Placement {
            start: Location::from_xy(0, 0),
            walls_main: [Location::from_xy(6, 6)].into_iter().collect(),
            walls_pab: Default::default(),
            angry_main: Default::default(),
            angry_pab: [Location::from_xy(9, 2)].into_iter().collect(),
            chair: Location::from_xy(11, 6),
            office: Location::from_xy(10, 4),
            bridge: geometry.bridge_cells().collect(),
        };
        let grid = WorldGrid::from_placement(geometry, &placement);
        let text = render_ascii(&grid, &placement);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], ". . . . . . #   . . . P");
        assert_eq!(lines[2], ". . . . . . .   . . O .");
        assert_eq!(lines[3], ". . . . . . . = . . . .");
        assert_eq!(lines[4], ". . . . . . .   . A . .");
        assert_eq!(lines[5], ". . . . . . .          ");
        assert_eq!(lines[6], "S . . . . . .          ");
    }
}
