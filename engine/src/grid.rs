//! Toroidal cell grid with a cached neighbor-sum matrix.

use rand::Rng;

use crate::error::EngineError;
use crate::grid::CellState::{Alive, Dead};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

impl CellState {
    pub fn is_alive(self) -> bool {
        self == Alive
    }
}

impl From<bool> for CellState {
    fn from(alive: bool) -> Self {
        if alive {
            Alive
        } else {
            Dead
        }
    }
}

/// Alive/dead counts over a whole grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub alive: usize,
    pub dead: usize,
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<CellState>>,
    neighbor_sums: Vec<Vec<u8>>,
}

impl Grid {
    /// Creates an all-dead grid of `width` columns by `height` rows.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Grid {
            width,
            height,
            cells: vec![vec![Dead; width]; height],
            neighbor_sums: vec![vec![0; width]; height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Vec<CellState>] {
        &self.cells
    }

    /// Sets every cell alive or dead with equal probability.
    pub fn randomize(&mut self) {
        self.randomize_with(&mut rand::rng());
    }

    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                *cell = if rng.random_bool(0.5) { Alive } else { Dead };
            }
        }
    }

    /// Refreshes the neighbor-sum matrix from the current cell states.
    ///
    /// Every sum is taken from the unmodified grid; nothing is written to
    /// `cells` here.
    pub fn compute_neighbor_sums(&mut self) {
        for row in 0..self.height {
            for col in 0..self.width {
                self.neighbor_sums[row][col] = self.alive_neighbors(row, col);
            }
        }
    }

    /// The sum cached by the last [`Grid::compute_neighbor_sums`] call.
    pub fn neighbor_sum(&self, row: usize, col: usize) -> Option<u8> {
        self.neighbor_sums.get(row)?.get(col).copied()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Writes a single cell directly, bypassing the transition rule.
    /// Coordinates are not wrapped.
    pub fn set_cell(&mut self, row: usize, col: usize, state: CellState) -> Result<(), EngineError> {
        if row >= self.height || col >= self.width {
            return Err(EngineError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        self.cells[row][col] = state;
        Ok(())
    }

    pub fn tally(&self) -> Tally {
        let alive = self.cells.iter().flatten().filter(|cell| cell.is_alive()).count();
        Tally {
            alive,
            dead: self.width * self.height - alive,
        }
    }

    /// Replaces every cell with `rule(state, neighbor_sum)` using the cached
    /// sums, and returns the tally of the new states.
    pub(crate) fn apply<F>(&mut self, rule: F) -> Tally
    where
        F: Fn(CellState, u8) -> CellState,
    {
        let mut tally = Tally::default();
        for (row, sums) in self.cells.iter_mut().zip(&self.neighbor_sums) {
            for (cell, &sum) in row.iter_mut().zip(sums) {
                *cell = rule(*cell, sum);
                match cell {
                    Alive => tally.alive += 1,
                    Dead => tally.dead += 1,
                }
            }
        }
        tally
    }

    /// Counts alive cells among the 8 neighbors, wrapping at the edges.
    fn alive_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;

        for dr in [-1isize, 0, 1] {
            for dc in [-1isize, 0, 1] {
                if dr == 0 && dc == 0 {
                    continue;
                }

                let neighbor_row = (row as isize + dr).rem_euclid(self.height as isize) as usize;
                let neighbor_col = (col as isize + dc).rem_euclid(self.width as isize) as usize;

                if self.cells[neighbor_row][neighbor_col] == Alive {
                    count += 1;
                }
            }
        }

        count
    }
}
