//! Grid representation and geometric operations

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// State of a single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        matches!(self, Cell::Alive)
    }

    /// Character used by the ascii format: `' '` for dead, `'#'` for alive
    pub fn to_char(self) -> char {
        match self {
            Cell::Dead => ' ',
            Cell::Alive => '#',
        }
    }

    /// Inverse of [`Cell::to_char`]; returns `None` for any other character
    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            ' ' => Some(Cell::Dead),
            '#' => Some(Cell::Alive),
            _ => None,
        }
    }

    /// Bit used by the binary format: 0 for dead, 1 for alive
    pub fn to_bit(self) -> u8 {
        match self {
            Cell::Dead => 0,
            Cell::Alive => 1,
        }
    }

    pub fn from_bit(bit: u8) -> Cell {
        if bit == 0 {
            Cell::Dead
        } else {
            Cell::Alive
        }
    }
}

/// A bounded 2D grid of cells stored row-major (`index = y * width + x`)
///
/// The buffer length always equals `width * height`. Cells default to dead
/// on construction and resize. Cloning a grid deep-copies the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty 0x0 grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a square grid of dead cells
    pub fn square(size: usize) -> Self {
        Self::with_size(size, size)
    }

    /// Create a `width x height` grid of dead cells
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Dead; width * height],
        }
    }

    /// Build a grid from ascii rows (`' '` dead, `'#'` alive)
    ///
    /// All rows must have the same length. Mostly useful for constructing
    /// fixtures and patterns.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::with_size(width, height);
        for (y, row) in rows.iter().enumerate() {
            let mut count = 0;
            for (x, c) in row.chars().enumerate() {
                let cell = Cell::from_char(c)
                    .ok_or_else(|| Error::Format(format!("unknown character {c:?} in row {y}")))?;
                if x < width {
                    grid.cells[y * width + x] = cell;
                }
                count += 1;
            }
            if count != width {
                return Err(Error::InvalidArgument(format!(
                    "row {y} has length {count}, expected {width}"
                )));
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    pub fn alive_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    pub fn dead_cells(&self) -> usize {
        self.total_cells() - self.alive_cells()
    }

    /// True when the grid contains no alive cells
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_alive())
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Get the cell at `(x, y)`, failing with [`Error::OutOfRange`] outside bounds
    pub fn get(&self, x: usize, y: usize) -> Result<Cell> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.offset(x, y)])
    }

    /// Set the cell at `(x, y)`, failing with [`Error::OutOfRange`] outside bounds
    pub fn set(&mut self, x: usize, y: usize, value: Cell) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.offset(x, y);
        self.cells[idx] = value;
        Ok(())
    }

    /// Read a cell at signed coordinates; anything outside the grid is dead
    pub(crate) fn cell_or_dead(&self, x: isize, y: isize) -> Cell {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[self.offset(x as usize, y as usize)]
        } else {
            Cell::Dead
        }
    }

    /// Resize to a square of the given size; see [`Grid::resize`]
    pub fn resize_square(&mut self, size: usize) {
        self.resize(size, size);
    }

    /// Resize the grid, keeping cell values in the overlap of the old and
    /// new bounds. New cells are dead; cells outside the new bounds are
    /// discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut cells = vec![Cell::Dead; width * height];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                cells[y * width + x] = self.cells[self.offset(x, y)];
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// Copy out the subregion `[x0, x1) x [y0, y1)` as a new grid
    ///
    /// The bounds may extend beyond the grid in any direction; source cells
    /// outside it read as dead. Inverted bounds fail with
    /// [`Error::InvalidArgument`].
    pub fn crop(&self, x0: isize, y0: isize, x1: isize, y1: isize) -> Result<Grid> {
        if x1 < x0 || y1 < y0 {
            return Err(Error::InvalidArgument(format!(
                "crop bounds ({x0}, {y0})..({x1}, {y1}) are inverted"
            )));
        }
        let mut out = Grid::with_size((x1 - x0) as usize, (y1 - y0) as usize);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = out.offset((x - x0) as usize, (y - y0) as usize);
                out.cells[idx] = self.cell_or_dead(x, y);
            }
        }
        Ok(out)
    }

    /// Overlay `other` onto this grid with its origin at `(x0, y0)`
    ///
    /// Cells of `other` landing outside this grid are clipped silently.
    /// With `alive_only` set, dead cells of `other` leave the underlying
    /// cells untouched.
    pub fn merge(&mut self, other: &Grid, x0: isize, y0: isize, alive_only: bool) {
        for y in 0..other.height {
            for x in 0..other.width {
                let tx = x0 + x as isize;
                let ty = y0 + y as isize;
                if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
                    continue;
                }
                let value = other.cells[other.offset(x, y)];
                if alive_only && !value.is_alive() {
                    continue;
                }
                let idx = self.offset(tx as usize, ty as usize);
                self.cells[idx] = value;
            }
        }
    }

    /// Return a copy rotated by `rotation * 90` degrees clockwise
    ///
    /// The rotation count is normalized modulo 4, so negative values rotate
    /// counter-clockwise. Width and height swap for odd rotations.
    pub fn rotate(&self, rotation: i32) -> Grid {
        match rotation.rem_euclid(4) {
            0 => self.clone(),
            1 => {
                let mut out = Grid::with_size(self.height, self.width);
                for y in 0..self.height {
                    for x in 0..self.width {
                        let idx = out.offset(self.height - 1 - y, x);
                        out.cells[idx] = self.cells[self.offset(x, y)];
                    }
                }
                out
            }
            2 => {
                let mut out = Grid::with_size(self.width, self.height);
                for y in 0..self.height {
                    for x in 0..self.width {
                        let idx = out.offset(self.width - 1 - x, self.height - 1 - y);
                        out.cells[idx] = self.cells[self.offset(x, y)];
                    }
                }
                out
            }
            3 => {
                let mut out = Grid::with_size(self.height, self.width);
                for y in 0..self.height {
                    for x in 0..self.width {
                        let idx = out.offset(y, self.width - 1 - x);
                        out.cells[idx] = self.cells[self.offset(x, y)];
                    }
                }
                out
            }
            _ => unreachable!(),
        }
    }
}

/// Operator-style access mirroring [`Grid::get`]; panics outside bounds
impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        assert!(
            x < self.width && y < self.height,
            "coordinate ({}, {}) out of range for {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        &self.cells[y * self.width + x]
    }
}

/// Operator-style access mirroring [`Grid::set`]; panics outside bounds
impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Cell {
        assert!(
            x < self.width && y < self.height,
            "coordinate ({}, {}) out of range for {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        &mut self.cells[y * self.width + x]
    }
}

impl fmt::Display for Grid {
    /// Renders a bordered rectangle:
    ///
    /// ```text
    /// +---+
    /// | # |
    /// |  #|
    /// |###|
    /// +---+
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border: String = std::iter::once('+')
            .chain(std::iter::repeat('-').take(self.width))
            .chain(std::iter::once('+'))
            .collect();
        writeln!(f, "{border}")?;
        for y in 0..self.height {
            write!(f, "|")?;
            for x in 0..self.width {
                write!(f, "{}", self.cells[self.offset(x, y)].to_char())?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{border}")
    }
}
