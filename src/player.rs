use log::trace;

use crate::cells::GridCoordinate;
use crate::grid::Grid;
use crate::units::Score;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The (row, column) step for the direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// W, A, S and D keys, either case.
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub score: Score,
}

impl Player {
    pub fn new(position: GridCoordinate) -> Player {
        Player {
            x: position.x,
            y: position.y,
            score: Score::default(),
        }
    }

    #[inline]
    pub fn position(&self) -> GridCoordinate {
        GridCoordinate::new(self.x, self.y)
    }

    /// Move by (dx, dy) if the target cell is a valid move on the grid.
    /// The grid itself is never changed. Returns true if the player moved.
    pub fn try_move(&mut self, dx: isize, dy: isize, grid: &Grid) -> bool {
        match self.position().offset(dx, dy) {
            Some(target) if grid.is_valid_move(target.x as isize, target.y as isize) => {
                self.x = target.x;
                self.y = target.y;
                true
            }
            _ => {
                trace!("blocked move from ({}, {}) by ({}, {})", self.x, self.y, dx, dy);
                false
            }
        }
    }

    pub fn award(&mut self, points: Score) {
        self.score = Score(self.score.0.saturating_add(points.0));
    }
}
