use crate::grid::{CellState, Grid};

/// Point-in-time copy of the grid and its counters, handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub cells: Vec<CellState>,
    pub generation: u64,
    pub alive_count: usize,
    pub dead_count: usize,
}

impl Snapshot {
    pub(crate) fn capture(grid: &Grid, generation: u64, alive_count: usize, dead_count: usize) -> Self {
        Snapshot {
            width: grid.width(),
            height: grid.height(),
            cells: grid.cells().iter().flatten().copied().collect(),
            generation,
            alive_count,
            dead_count,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Every cell as `(row, col, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, &state)| (index / width, index % width, state))
    }
}
