use crate::cells::{CellState, GridCoordinate};
use crate::errors::*;
use crate::units::{Height, Width};

use smallvec::SmallVec;
use std::fmt;
use std::slice;

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

const STEP_OFFSETS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// A rectangular maze, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<CellState>,
    start_position: GridCoordinate,
    exit_position: Option<GridCoordinate>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, start: {:?}, exit: {:?}",
               self.width, self.height, self.start_position, self.exit_position)
    }
}

impl Grid {
    /// A grid of the given size where every cell is a `Wall` and no exit is set yet.
    ///
    /// Panics if `width * height` overflows, like any other oversized allocation.
    /// `generators::validate_dimensions` rejects such sizes before a grid is built.
    pub fn new(width: Width, height: Height) -> Grid {
        let cell_count = width.0.checked_mul(height.0).expect("grid cell count overflows usize");
        Grid {
            width,
            height,
            cells: vec![CellState::Wall; cell_count],
            start_position: GridCoordinate::new(1, 1),
            exit_position: None,
        }
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn start_position(&self) -> GridCoordinate {
        self.start_position
    }

    /// Where the exit is, once the maze has been generated.
    #[inline]
    pub fn exit_position(&self) -> Option<GridCoordinate> {
        self.exit_position
    }

    pub(crate) fn set_exit_position(&mut self, coord: GridCoordinate) {
        self.exit_position = Some(coord);
    }

    /// Can something stand at (x, y)? True when it is inside the grid and not a wall.
    ///
    /// Only immediate bounds and wall status are considered, not reachability.
    pub fn is_valid_move(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.grid_coordinate_to_index(GridCoordinate::new(x as usize, y as usize))
            .map_or(false, |index| self.cells[index].is_open())
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Result<CellState> {
        let index = self.checked_index(x, y)?;
        Ok(self.cells[index])
    }

    /// Overwrite a single cell. The new state is not validated.
    pub fn update_cell(&mut self, x: usize, y: usize, new_state: CellState) -> Result<()> {
        let index = self.checked_index(x, y)?;
        self.cells[index] = new_state;
        Ok(())
    }

    /// Is the grid coordinate within the grid's dimensions.
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.x < self.height.0 && coord.y < self.width.0
    }

    /// Convert a grid coordinate to a one dimensional row-major index.
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.x * self.width.0 + coord.y)
        } else {
            None
        }
    }

    /// Cells one step away to the east, south, west or north that are not walls.
    pub fn open_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        STEP_OFFSETS.iter()
            .filter_map(|&(dx, dy)| coord.offset(dx, dy))
            .filter(|&neighbour| {
                self.grid_coordinate_to_index(neighbour)
                    .map_or(false, |index| self.cells[index].is_open())
            })
            .collect()
    }

    pub fn count_cells(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == state).count()
    }

    #[inline]
    pub fn iter_row(&self) -> slice::Chunks<CellState> {
        // chunks panics on a zero chunk size
        self.cells.chunks(self.width.0.max(1))
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize> {
        self.grid_coordinate_to_index(GridCoordinate::new(x, y))
            .ok_or_else(|| ErrorKind::OutOfBounds(x as isize, y as isize).into())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    fn open_grid(w: usize, h: usize) -> Grid {
        let mut g = Grid::new(Width(w), Height(h));
        for x in 1..h - 1 {
            for y in 1..w - 1 {
                g.update_cell(x, y, CellState::Path).expect("in bounds");
            }
        }
        g
    }

    #[test]
    fn new_grid_is_all_wall() {
        let g = Grid::new(Width(5), Height(7));
        assert_eq!(g.size(), 35);
        assert_eq!(g.count_cells(CellState::Wall), 35);
        assert_eq!(g.start_position(), GridCoordinate::new(1, 1));
        assert_eq!(g.exit_position(), None);
    }

    #[test]
    fn valid_moves() {
        let g = open_grid(5, 5);
        assert!(g.is_valid_move(1, 1));
        assert!(g.is_valid_move(3, 3));
        assert!(!g.is_valid_move(0, 1));
        assert!(!g.is_valid_move(-1, 1));
        assert!(!g.is_valid_move(1, -1));
        assert!(!g.is_valid_move(5, 1));
        assert!(!g.is_valid_move(1, 5));
    }

    #[test]
    fn out_of_bounds_access_fails() {
        let mut g = Grid::new(Width(3), Height(5));
        assert!(g.get_cell(4, 2).is_ok());
        assert!(g.get_cell(5, 0).is_err());
        assert!(g.get_cell(0, 3).is_err());
        match g.update_cell(2, 3, CellState::Path) {
            Err(Error(ErrorKind::OutOfBounds(2, 3), _)) => {}
            other => panic!("expected out of bounds, got {:?}", other),
        }
    }

    #[test]
    fn update_then_get() {
        let mut g = Grid::new(Width(5), Height(5));
        g.update_cell(2, 3, CellState::Exit).unwrap();
        assert_eq!(g.get_cell(2, 3).unwrap(), CellState::Exit);
        assert!(g.is_valid_move(2, 3));
        g.update_cell(2, 3, CellState::Wall).unwrap();
        assert!(!g.is_valid_move(2, 3));
    }

    #[test]
    fn row_major_indexing_uses_width() {
        let g = Grid::new(Width(4), Height(3));
        let gc = |x, y| GridCoordinate::new(x, y);
        assert_eq!(g.grid_coordinate_to_index(gc(0, 0)), Some(0));
        assert_eq!(g.grid_coordinate_to_index(gc(0, 3)), Some(3));
        assert_eq!(g.grid_coordinate_to_index(gc(1, 0)), Some(4));
        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), Some(11));
        assert_eq!(g.grid_coordinate_to_index(gc(3, 0)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(0, 4)), None);
    }

    #[test]
    fn open_neighbour_cells() {
        let g = open_grid(5, 5);
        let gc = |x, y| GridCoordinate::new(x, y);
        let check_expected_neighbours = |coord, expected: &[GridCoordinate]| {
            let found: Vec<GridCoordinate> = g.open_neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected.iter().cloned().sorted().collect();
            assert_eq!(found, expected);
        };

        // corner of the open area: border walls are excluded
        check_expected_neighbours(gc(1, 1), &[gc(1, 2), gc(2, 1)]);
        check_expected_neighbours(gc(2, 2), &[gc(1, 2), gc(3, 2), gc(2, 1), gc(2, 3)]);
        // a border cell on the grid edge itself
        check_expected_neighbours(gc(0, 0), &[]);
        check_expected_neighbours(gc(0, 2), &[gc(1, 2)]);
    }

    #[test]
    fn rows() {
        let mut g = Grid::new(Width(3), Height(2));
        g.update_cell(1, 2, CellState::Path).unwrap();
        let rows = g.iter_row().map(|row| row.to_vec()).collect::<Vec<_>>();
        assert_eq!(rows,
                   vec![vec![CellState::Wall, CellState::Wall, CellState::Wall],
                        vec![CellState::Wall, CellState::Wall, CellState::Path]]);
    }
}
