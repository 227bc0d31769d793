//! Double-buffered simulation world applying the Game of Life rules

use crate::error::Result;
use crate::grid::{Cell, Grid};
use log::trace;

/// A simulation world holding the current generation and a scratch buffer
///
/// Stepping writes the next generation into the scratch grid and then swaps
/// the two buffers, so no cell data is copied and no reallocation happens.
/// Both grids have equal dimensions at all times outside a step in progress.
#[derive(Debug, Clone, Default)]
pub struct World {
    current: Grid,
    next: Grid,
}

impl World {
    /// Create an empty 0x0 world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a square world of dead cells
    pub fn square(size: usize) -> Self {
        Self::with_size(size, size)
    }

    /// Create a `width x height` world of dead cells
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            current: Grid::with_size(width, height),
            next: Grid::with_size(width, height),
        }
    }

    /// Create a world whose first generation is the given grid
    pub fn from_grid(initial: Grid) -> Self {
        let next = Grid::with_size(initial.width(), initial.height());
        Self {
            current: initial,
            next,
        }
    }

    pub fn width(&self) -> usize {
        self.current.width()
    }

    pub fn height(&self) -> usize {
        self.current.height()
    }

    pub fn total_cells(&self) -> usize {
        self.current.total_cells()
    }

    pub fn alive_cells(&self) -> usize {
        self.current.alive_cells()
    }

    pub fn dead_cells(&self) -> usize {
        self.current.dead_cells()
    }

    /// The current generation
    pub fn get_state(&self) -> &Grid {
        &self.current
    }

    /// Cell of the current generation at `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Result<Cell> {
        self.current.get(x, y)
    }

    /// Count alive cells among the 8 neighbours of `(x, y)`
    ///
    /// With `toroidal` set, coordinates wrap modulo width/height, so the
    /// neighbour left of column 0 is the last column. Otherwise neighbours
    /// beyond the edges count as dead.
    pub fn count_neighbours(&self, x: usize, y: usize, toroidal: bool) -> u8 {
        let width = self.width() as isize;
        let height = self.height() as isize;
        if width == 0 || height == 0 {
            return 0;
        }
        let mut count = 0;
        for dy in [-1, 0, 1] {
            for dx in [-1, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let mut nx = x as isize + dx;
                let mut ny = y as isize + dy;
                if toroidal {
                    nx = nx.rem_euclid(width);
                    ny = ny.rem_euclid(height);
                }
                if self.current.cell_or_dead(nx, ny).is_alive() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Advance the world by one generation
    ///
    /// A dead cell with exactly 3 alive neighbours becomes alive; an alive
    /// cell with 2 or 3 alive neighbours survives; every other cell is dead
    /// in the next generation.
    pub fn step(&mut self, toroidal: bool) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let neighbours = self.count_neighbours(x, y, toroidal);
                let cell = match (self.current[(x, y)], neighbours) {
                    (Cell::Alive, 2) | (Cell::Alive, 3) | (Cell::Dead, 3) => Cell::Alive,
                    _ => Cell::Dead,
                };
                self.next[(x, y)] = cell;
            }
        }
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Advance the world by `steps` generations sequentially
    ///
    /// Runs to completion; callers wanting interruption should advance in
    /// smaller batches.
    pub fn advance(&mut self, steps: u32, toroidal: bool) {
        for generation in 0..steps {
            self.step(toroidal);
            trace!(
                "generation {}/{}: {} alive",
                generation + 1,
                steps,
                self.alive_cells()
            );
        }
    }

    /// Resize both buffers to a square of the given size; see [`World::resize`]
    pub fn resize_square(&mut self, size: usize) {
        self.resize(size, size);
    }

    /// Resize both buffers identically, keeping current cells in the
    /// overlap of the old and new bounds
    pub fn resize(&mut self, width: usize, height: usize) {
        self.current.resize(width, height);
        self.next.resize(width, height);
    }
}
