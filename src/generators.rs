use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::cells::{CellState, GridCoordinate};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Carving only ever jumps two cells along one axis, so the cell in between is the wall to remove.
const CARVE_OFFSETS: [(isize, isize); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Generation-only view of a cell. Never leaves this module.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Carving {
    Uncarved,
    Carved,
}

struct CarvingBuffer {
    width: usize,
    height: usize,
    cells: Vec<Carving>,
}

impl CarvingBuffer {
    fn new(width: usize, height: usize) -> CarvingBuffer {
        CarvingBuffer {
            width,
            height,
            cells: vec![Carving::Uncarved; width * height],
        }
    }

    #[inline]
    fn carve(&mut self, coord: GridCoordinate) {
        self.cells[coord.x * self.width + coord.y] = Carving::Carved;
    }

    #[inline]
    fn is_uncarved(&self, coord: GridCoordinate) -> bool {
        self.cells[coord.x * self.width + coord.y] == Carving::Uncarved
    }

    /// Cells two steps away that are strictly inside the border and still uncarved.
    fn carve_candidates(&self, current: GridCoordinate) -> SmallVec<[(isize, isize, GridCoordinate); 4]> {
        CARVE_OFFSETS.iter()
            .filter_map(|&(dx, dy)| current.offset(dx, dy).map(|next| (dx, dy, next)))
            .filter(|&(_, _, next)| {
                0 < next.x && next.x < self.height - 1 &&
                0 < next.y && next.y < self.width - 1 &&
                self.is_uncarved(next)
            })
            .collect()
    }
}

/// Check the dimensions line up with the odd offset carving: a wall border, odd start cell and
/// carving by two cells at a time. The start and exit must also be different cells, and the cell
/// count must fit in a `usize`.
pub fn validate_dimensions(width: Width, height: Height) -> Result<()> {
    let (Width(w), Height(h)) = (width, height);
    let odd_and_large_enough = |n: usize| n >= 3 && n % 2 == 1;

    if odd_and_large_enough(w) && odd_and_large_enough(h) && (w > 3 || h > 3) &&
       w.checked_mul(h).is_some() {
        Ok(())
    } else {
        Err(ErrorKind::InvalidDimensions(w, h).into())
    }
}

/// Apply the recursive backtracker maze generation algorithm, a randomised depth first search.
///
/// The walk starts at (1, 1) and always extends the most recently visited cell that still has
/// uncarved cells two steps away, knocking out the wall in between. Cells with nothing left to
/// carve are popped off the stack, backtracking to an earlier cell.
/// Every carve step joins exactly one new cell onto the carved region so the result is a perfect
/// maze: a spanning tree of the carved cells, which is why the exit is always reachable.
///
/// The border is never carved. (1, 1) is marked `Start` and (height - 2, width - 2) `Exit`.
pub fn recursive_backtracker<R>(width: Width, height: Height, rng: &mut R) -> Result<Grid>
    where R: Rng + ?Sized
{
    validate_dimensions(width, height)?;

    let mut buffer = CarvingBuffer::new(width.0, height.0);
    let start = GridCoordinate::new(1, 1);
    buffer.carve(start);
    let mut stack = vec![start];
    let mut carve_steps = 0usize;

    while let Some(&current) = stack.last() {

        let candidates = buffer.carve_candidates(current);

        if candidates.is_empty() {
            let _ = stack.pop();
        } else {
            let (dx, dy, next) = candidates[rng.gen_range(0..candidates.len())];

            // offsets are +/- 2 on one axis so the midpoint is always inside the grid
            let wall = GridCoordinate::new((current.x as isize + dx / 2) as usize,
                                           (current.y as isize + dy / 2) as usize);
            buffer.carve(wall);
            buffer.carve(next);
            stack.push(next);
            carve_steps += 1;
        }
    }

    let mut grid = Grid::new(width, height);
    for x in 0..height.0 {
        for y in 0..width.0 {
            let coord = GridCoordinate::new(x, y);
            if !buffer.is_uncarved(coord) {
                grid.update_cell(x, y, CellState::Path)?;
            }
        }
    }

    let exit = GridCoordinate::new(height.0 - 2, width.0 - 2);
    grid.update_cell(start.x, start.y, CellState::Start)?;
    grid.update_cell(exit.x, exit.y, CellState::Exit)?;
    grid.set_exit_position(exit);

    debug!("carved {}x{} maze in {} steps", width.0, height.0, carve_steps);

    Ok(grid)
}

/// Generate a maze with the thread local random number generator.
pub fn generate(width: Width, height: Height) -> Result<Grid> {
    let mut rng = rand::thread_rng();
    recursive_backtracker(width, height, &mut rng)
}

/// Generate a maze that is identical for every call with the same seed and dimensions.
pub fn generate_seeded(width: Width, height: Height, seed: u64) -> Result<Grid> {
    let mut rng = StdRng::seed_from_u64(seed);
    recursive_backtracker(width, height, &mut rng)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::pathing::Distances;
    use quickcheck::{quickcheck, TestResult};
    use std::collections::VecDeque;

    fn gc(x: usize, y: usize) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    fn border_is_wall(grid: &Grid) -> bool {
        let (Width(w), Height(h)) = (grid.width(), grid.height());
        (0..w).all(|y| {
            grid.get_cell(0, y).unwrap() == CellState::Wall &&
            grid.get_cell(h - 1, y).unwrap() == CellState::Wall
        }) &&
        (0..h).all(|x| {
            grid.get_cell(x, 0).unwrap() == CellState::Wall &&
            grid.get_cell(x, w - 1).unwrap() == CellState::Wall
        })
    }

    // Open cells joined by their 4-adjacencies form a tree iff edges == nodes - 1 and all are connected.
    fn is_perfect_maze(grid: &Grid) -> bool {
        let (Width(w), Height(h)) = (grid.width(), grid.height());
        let mut nodes = 0;
        let mut edges = 0;
        for x in 0..h {
            for y in 0..w {
                if grid.get_cell(x, y).unwrap().is_open() {
                    nodes += 1;
                    // count each edge once, looking east and south only
                    if grid.is_valid_move(x as isize, y as isize + 1) {
                        edges += 1;
                    }
                    if grid.is_valid_move(x as isize + 1, y as isize) {
                        edges += 1;
                    }
                }
            }
        }

        let mut seen = vec![false; w * h];
        let mut queue = VecDeque::new();
        queue.push_back(grid.start_position());
        seen[grid.grid_coordinate_to_index(grid.start_position()).unwrap()] = true;
        let mut reached = 0;
        while let Some(coord) = queue.pop_front() {
            reached += 1;
            for n in grid.open_neighbours(coord).iter() {
                let index = grid.grid_coordinate_to_index(*n).unwrap();
                if !seen[index] {
                    seen[index] = true;
                    queue.push_back(*n);
                }
            }
        }

        edges + 1 == nodes && reached == nodes
    }

    #[test]
    fn level_one_maze() {
        let grid = generate(Width(17), Height(17)).unwrap();

        assert_eq!(grid.get_cell(1, 1).unwrap(), CellState::Start);
        assert_eq!(grid.get_cell(15, 15).unwrap(), CellState::Exit);
        assert_eq!(grid.exit_position(), Some(gc(15, 15)));
        assert!(border_is_wall(&grid));

        let distances = Distances::new(&grid, gc(1, 1)).unwrap();
        assert!(distances.distance_from_start_to(gc(15, 15)).is_some());
    }

    #[test]
    fn single_start_and_exit_markers() {
        let grid = generate_seeded(Width(21), Height(19), 7).unwrap();
        assert_eq!(grid.count_cells(CellState::Start), 1);
        assert_eq!(grid.count_cells(CellState::Exit), 1);
        assert_eq!(grid.get_cell(17, 19).unwrap(), CellState::Exit);
    }

    #[test]
    fn every_odd_cell_is_carved() {
        // A depth first search visits every cell on the odd lattice before the stack empties.
        let grid = generate_seeded(Width(15), Height(11), 3).unwrap();
        for x in (1..10).step_by(2) {
            for y in (1..14).step_by(2) {
                assert!(grid.get_cell(x, y).unwrap().is_open());
            }
        }
        // Even-even cells are corners between walls and never carved
        for x in (0..11).step_by(2) {
            for y in (0..15).step_by(2) {
                assert_eq!(grid.get_cell(x, y).unwrap(), CellState::Wall);
            }
        }
    }

    #[test]
    fn generated_maze_is_perfect() {
        for seed in 0..20 {
            let grid = generate_seeded(Width(17), Height(23), seed).unwrap();
            assert!(is_perfect_maze(&grid), "seed {} produced a maze with cycles", seed);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate_seeded(Width(25), Height(25), 1234).unwrap();
        let b = generate_seeded(Width(25), Height(25), 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn narrow_corridor_mazes() {
        let grid = generate_seeded(Width(9), Height(3), 0).unwrap();
        for y in 1..8 {
            assert!(grid.get_cell(1, y).unwrap().is_open());
        }
        assert_eq!(grid.exit_position(), Some(gc(1, 7)));

        let grid = generate_seeded(Width(3), Height(5), 0).unwrap();
        assert_eq!(grid.exit_position(), Some(gc(3, 1)));
        assert_eq!(grid.get_cell(2, 1).unwrap(), CellState::Path);
    }

    #[test]
    fn invalid_dimensions_rejected() {
        let huge = usize::MAX; // odd
        let rejected = [(0, 0), (1, 1), (3, 3), (16, 17), (17, 16), (2, 5), (5, 1),
                        (huge, 3), (3, huge), (huge, huge)];
        for &(w, h) in rejected.iter() {
            match generate_seeded(Width(w), Height(h), 0) {
                Err(Error(ErrorKind::InvalidDimensions(ew, eh), _)) => {
                    assert_eq!((ew, eh), (w, h));
                }
                other => panic!("{}x{} should be rejected, got {:?}", w, h, other),
            }
        }
    }

    #[test]
    fn quickcheck_generated_mazes_hold_invariants() {

        fn p(half_width: u8, half_height: u8, seed: u64) -> TestResult {
            let (w, h) = (2 * (half_width % 20) as usize + 3, 2 * (half_height % 20) as usize + 3);
            if w == 3 && h == 3 {
                return TestResult::discard();
            }
            let grid = generate_seeded(Width(w), Height(h), seed).unwrap();
            let exit = grid.exit_position().unwrap();

            TestResult::from_bool(border_is_wall(&grid) &&
                                  is_perfect_maze(&grid) &&
                                  grid.count_cells(CellState::Start) == 1 &&
                                  grid.count_cells(CellState::Exit) == 1 &&
                                  exit == gc(h - 2, w - 2))
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult)
    }
}
