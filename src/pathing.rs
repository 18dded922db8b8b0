// Breadth first flood fill over the open cells of a maze.
//
// Every step is one cell so a cell's distance is final the first time it is reached, and the
// distances map doubles as the visited set.

use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::grid::Grid;
use crate::utils;
use crate::utils::FnvHashMap;

#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood fill from `start_coordinate`.
    /// Returns None if the start is outside the grid or is a wall.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        if !grid.is_valid_move(start_coordinate.x as isize, start_coordinate.y as isize) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link_coordinate in grid.open_neighbours(*cell_coord).iter() {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + 1);
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// Number of cells reachable from the start, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect()
    }
}

/// Walk back from `end_point` to the start of `distances`, always stepping to a neighbour one
/// closer to the start.
/// Returns the path ordered from start to end, or None if the end point is unreachable.
pub fn shortest_path(grid: &Grid,
                     distances: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    let end_distance = distances.distance_from_start_to(end_point)?;

    let mut path = Vec::with_capacity(end_distance as usize + 1);
    path.push(end_point);
    let mut current = end_point;
    let mut current_distance = end_distance;

    while current_distance > 0 {
        let closer = grid.open_neighbours(current)
            .iter()
            .cloned()
            .find(|n| distances.distance_from_start_to(*n) == Some(current_distance - 1))?;
        path.push(closer);
        current = closer;
        current_distance -= 1;
    }

    path.reverse();
    Some(path)
}

/// The route from a generated maze's start to its exit.
pub fn solution_path(grid: &Grid) -> Option<Vec<GridCoordinate>> {
    let exit = grid.exit_position()?;
    let distances = Distances::new(grid, grid.start_position())?;
    shortest_path(grid, &distances, exit)
}
