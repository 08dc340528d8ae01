// Flood fill over a boolean occupancy grid
//
// Visiting a cell marks it occupied, so each cell is counted at most once and
// the fill always terminates. The traversal uses an explicit stack.

use crate::profile;
use crate::snapshot::GameSnapshot;
use crate::types::Coord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-free grid
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        OccupancyGrid {
            width,
            height,
            cells: vec![false; len],
        }
    }

    /// Grid with every snake segment and every hazard marked occupied
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let mut grid = Self::new(snapshot.width(), snapshot.height());
        for segment in snapshot.body_cells() {
            grid.occupy(segment);
        }
        for hazard in snapshot.hazards() {
            grid.occupy(hazard);
        }
        grid
    }

    fn index(&self, coord: &Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 || coord.x >= self.width || coord.y >= self.height {
            return None;
        }
        Some((coord.y * self.width + coord.x) as usize)
    }

    /// Out-of-bounds cells count as occupied
    pub fn is_occupied(&self, coord: &Coord) -> bool {
        self.index(coord).map_or(true, |idx| self.cells[idx])
    }

    pub fn occupy(&mut self, coord: &Coord) {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = true;
        }
    }

    pub fn release(&mut self, coord: &Coord) {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = false;
        }
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|occupied| !**occupied).count()
    }
}

/// Counts the free cells reachable from `start`, `start` included
///
/// Consumes the free cells it reaches: afterwards every counted cell is marked
/// occupied in `grid`. Returns 0 when `start` is occupied or off the board.
pub fn open_space_count(start: Coord, grid: &mut OccupancyGrid) -> usize {
    profile!("flood_fill", {
        if grid.is_occupied(&start) {
            return 0;
        }

        let mut stack = vec![start];
        grid.occupy(&start);
        let mut count = 0;

        while let Some(cell) = stack.pop() {
            count += 1;
            for neighbor in cell.neighbors().iter() {
                if !grid.is_occupied(neighbor) {
                    grid.occupy(neighbor);
                    stack.push(*neighbor);
                }
            }
        }

        count
    })
}
