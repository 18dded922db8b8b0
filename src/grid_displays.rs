use std::fmt;

use itertools::Itertools;

use crate::cells::{CellState, GridCoordinate};
use crate::grid::Grid;
use crate::utils::{self, FnvHashSet};

pub const WALL_GLYPH: &str = "██";
pub const PATH_GLYPH: &str = "  ";
pub const EXIT_GLYPH: &str = "[]";
pub const PLAYER_GLYPH: &str = "@@";
pub const ROUTE_GLYPH: &str = "..";

/// Something drawn over the top of the maze cells.
pub trait GridDisplay {
    /// The two character glyph to draw at `coord` instead of the cell, if any.
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<&'static str>;
}

/// The player's live position. The grid only knows where the maze starts.
#[derive(Debug)]
pub struct PlayerDisplay {
    position: GridCoordinate,
}
impl PlayerDisplay {
    pub fn new(position: GridCoordinate) -> Self {
        PlayerDisplay { position }
    }
}
impl GridDisplay for PlayerDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<&'static str> {
        if coord == self.position {
            Some(PLAYER_GLYPH)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        let mut on_path_coordinates = utils::fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> Option<&'static str> {
        if self.on_path_coordinates.contains(&coord) {
            Some(ROUTE_GLYPH)
        } else {
            None
        }
    }
}

pub fn cell_glyph(cell: CellState) -> &'static str {
    match cell {
        CellState::Wall => WALL_GLYPH,
        CellState::Path | CellState::Start => PATH_GLYPH,
        CellState::Exit => EXIT_GLYPH,
    }
}

/// Text rendering of a maze framed by `=` rows and `|` columns.
/// Earlier overlays win over later ones, and the exit is never hidden by an overlay other than
/// the player.
pub struct MazeView<'a> {
    grid: &'a Grid,
    overlays: Vec<&'a dyn GridDisplay>,
}

impl<'a> MazeView<'a> {
    pub fn new(grid: &'a Grid) -> MazeView<'a> {
        MazeView {
            grid,
            overlays: vec![],
        }
    }

    pub fn with_overlay(mut self, overlay: &'a dyn GridDisplay) -> MazeView<'a> {
        self.overlays.push(overlay);
        self
    }

    fn glyph_at(&self, coord: GridCoordinate, cell: CellState) -> &'static str {
        let overlay_glyph = self.overlays
            .iter()
            .filter_map(|overlay| overlay.render_cell_body(coord))
            .next();

        match overlay_glyph {
            Some(ROUTE_GLYPH) if cell == CellState::Exit => EXIT_GLYPH,
            Some(glyph) => glyph,
            None => cell_glyph(cell),
        }
    }
}

impl<'a> fmt::Display for MazeView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frame = "=".repeat(self.grid.width().0 * WALL_GLYPH.chars().count() + 2);

        writeln!(f, "{}", frame)?;
        for (x, row) in self.grid.iter_row().enumerate() {
            let body = row.iter()
                .enumerate()
                .map(|(y, cell)| self.glyph_at(GridCoordinate::new(x, y), *cell))
                .join("");
            writeln!(f, "|{}|", body)?;
        }
        writeln!(f, "{}", frame)
    }
}
