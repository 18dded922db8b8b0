use std::convert::From;

/// The state of one maze cell as seen by callers of the generator.
///
/// `Start` marks where the maze begins. It is not the player: a player's live location is only
/// held by `player::Player` and is overlaid by the renderers.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellState {
    Wall,
    Path,
    Start,
    Exit,
}

impl CellState {
    #[inline]
    pub fn is_open(self) -> bool {
        self != CellState::Wall
    }
}

/// A cell location. `x` is the row index and `y` the column index.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: usize,
    pub y: usize,
}

impl GridCoordinate {
    pub fn new(x: usize, y: usize) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    /// Offset by a signed delta.
    /// Returns None if either resulting index would be negative or unrepresentable.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<GridCoordinate> {
        let x = (self.x as isize).checked_add(dx)?;
        let y = (self.y as isize).checked_add(dy)?;
        if x >= 0 && y >= 0 {
            Some(GridCoordinate::new(x as usize, y as usize))
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(x_y_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}
