//! Simulation controller: generation counting, tallies and the
//! run/pause/edit protocol around a [`Grid`].
//!
//! The controller does no locking of its own. Every call that mutates it
//! (`step`, `set_cell`, `randomize`, `resize`) must come from one owner at a
//! time; [`crate::Worker`] provides that by confining the controller to a
//! single thread. A host that shares it between threads has to wrap it in a
//! mutex held for the full-grid pass.

use log::{info, trace, warn};

use crate::error::EngineError;
use crate::grid::{CellState, Grid, Tally};
use crate::rule;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Uninitialized,
    Running,
    Paused,
}

#[derive(Debug)]
pub struct Simulation {
    cell_size: u32,
    dimensions: Option<(usize, usize)>,
    grid: Option<Grid>,
    running: bool,
    generation: u64,
    tally: Tally,
}

impl Simulation {
    /// A controller with no grid yet. `cell_size` is the pixel edge length
    /// used to map pointer coordinates onto cells and must be positive.
    pub fn new(cell_size: u32) -> Result<Self, EngineError> {
        if cell_size == 0 {
            return Err(EngineError::InvalidConfig {
                key: "cell_size",
                value: cell_size.to_string(),
            });
        }
        Ok(Simulation {
            cell_size,
            dimensions: None,
            grid: None,
            running: false,
            generation: 0,
            tally: Tally::default(),
        })
    }

    /// A paused controller around an existing grid, at generation 0.
    pub fn with_grid(cell_size: u32, grid: Grid) -> Result<Self, EngineError> {
        let mut simulation = Simulation::new(cell_size)?;
        simulation.dimensions = Some((grid.width(), grid.height()));
        simulation.tally = grid.tally();
        simulation.grid = Some(grid);
        Ok(simulation)
    }

    pub fn state(&self) -> RunState {
        match (&self.grid, self.running) {
            (None, _) => RunState::Uninitialized,
            (Some(_), true) => RunState::Running,
            (Some(_), false) => RunState::Paused,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alive_count(&self) -> usize {
        self.tally.alive
    }

    pub fn dead_count(&self) -> usize {
        self.tally.dead
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Records new grid dimensions, in cells. The old grid is dropped and the
    /// controller pauses; the next [`Simulation::start`] builds a fresh,
    /// randomized grid of the new size.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        self.dimensions = Some((width, height));
        self.grid = None;
        self.running = false;
        Ok(())
    }

    /// Resumes stepping, creating and randomizing the grid first if there is
    /// none.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.grid.is_none() {
            let (width, height) = self.dimensions.ok_or(EngineError::Uninitialized)?;
            let mut grid = Grid::new(width, height)?;
            grid.randomize();
            info!("created {width}x{height} grid");
            self.tally = grid.tally();
            self.grid = Some(grid);
            self.generation = 0;
        }
        self.running = true;
        Ok(())
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Drops the grid and pauses. Dimensions are kept so a later `start`
    /// rebuilds at the same size.
    pub fn release(&mut self) {
        self.running = false;
        self.grid = None;
        self.tally = Tally::default();
    }

    /// Reseeds every cell at random and resets the generation counter.
    /// The run/pause state is left alone.
    pub fn randomize(&mut self) -> Result<(), EngineError> {
        let grid = self.grid.as_mut().ok_or(EngineError::Uninitialized)?;
        grid.randomize();
        self.tally = grid.tally();
        self.generation = 0;
        Ok(())
    }

    /// Advances one generation over the whole grid. Returns `false` without
    /// touching anything when paused or uninitialized.
    pub fn step(&mut self) -> bool {
        if !self.running {
            trace!("step skipped: paused");
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            trace!("step skipped: no grid");
            return false;
        };

        grid.compute_neighbor_sums();
        self.tally = grid.apply(rule::next_state);
        self.generation += 1;
        true
    }

    /// Maps a pointer position in pixels to `(row, col)`, or `None` when it
    /// falls outside the grid.
    ///
    /// Positions are floor-divided, so anything left of or above the board
    /// is rejected rather than truncated onto column or row 0.
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let (width, height) = self.grid.as_ref().map(|grid| (grid.width(), grid.height()))?;
        let (row, col) = self.raw_cell(x, y);
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < height && col < width).then_some((row, col))
    }

    /// Unchecked `(row, col)` under a pixel position, possibly negative.
    fn raw_cell(&self, x: f32, y: f32) -> (f32, f32) {
        let size = self.cell_size as f32;
        ((y.round() / size).floor(), (x.round() / size).floor())
    }

    /// Marks the cell under a pointer position alive. Positions outside the
    /// grid are logged and ignored. Returns the cell that was set.
    pub fn set_cell(&mut self, x: f32, y: f32) -> Option<(usize, usize)> {
        let Some((row, col)) = self.cell_at(x, y) else {
            let (raw_row, raw_col) = self.raw_cell(x, y);
            match &self.grid {
                Some(grid) => warn!(
                    "ignoring touch at ({x}, {y}): cell ({raw_row}, {raw_col}) is outside {}x{} grid of {} px cells",
                    grid.width(),
                    grid.height(),
                    self.cell_size
                ),
                None => warn!("ignoring touch at ({x}, {y}): no grid"),
            }
            return None;
        };
        match self.set_cell_at(row, col, CellState::Alive) {
            Ok(()) => Some((row, col)),
            Err(err) => {
                warn!("ignoring touch at ({x}, {y}): {err}");
                None
            }
        }
    }

    /// Writes one cell by grid coordinates, keeping the tallies in step.
    pub fn set_cell_at(&mut self, row: usize, col: usize, state: CellState) -> Result<(), EngineError> {
        let grid = self.grid.as_mut().ok_or(EngineError::Uninitialized)?;
        let previous = grid.get(row, col);
        grid.set_cell(row, col, state)?;
        match (previous, state) {
            (Some(CellState::Dead), CellState::Alive) => {
                self.tally.alive += 1;
                self.tally.dead -= 1;
            }
            (Some(CellState::Alive), CellState::Dead) => {
                self.tally.alive -= 1;
                self.tally.dead += 1;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        let grid = self.grid.as_ref()?;
        Some(Snapshot::capture(grid, self.generation, self.tally.alive, self.tally.dead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState::{Alive, Dead};

    fn paused_with(width: usize, height: usize, alive: &[(usize, usize)]) -> Simulation {
        let mut grid = Grid::new(width, height).unwrap();
        for &(row, col) in alive {
            grid.set_cell(row, col, Alive).unwrap();
        }
        Simulation::with_grid(10, grid).unwrap()
    }

    fn alive_cells(simulation: &Simulation) -> Vec<(usize, usize)> {
        simulation
            .snapshot()
            .unwrap()
            .iter()
            .filter(|(_, _, state)| state.is_alive())
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    #[test]
    fn test_lifecycle_states() {
        let mut simulation = Simulation::new(10).unwrap();
        assert_eq!(simulation.state(), RunState::Uninitialized);
        assert!(matches!(simulation.start(), Err(EngineError::Uninitialized)));
        assert!(simulation.snapshot().is_none());

        simulation.resize(8, 6).unwrap();
        assert_eq!(simulation.state(), RunState::Uninitialized);

        simulation.start().unwrap();
        assert_eq!(simulation.state(), RunState::Running);
        assert_eq!(simulation.generation(), 0);
        let grid = simulation.grid().unwrap();
        assert_eq!((grid.width(), grid.height()), (8, 6));
        assert_eq!(simulation.alive_count() + simulation.dead_count(), 48);

        simulation.pause();
        assert_eq!(simulation.state(), RunState::Paused);
        simulation.start().unwrap();
        assert_eq!(simulation.state(), RunState::Running);

        simulation.release();
        assert_eq!(simulation.state(), RunState::Uninitialized);
        assert!(!simulation.is_running());
    }

    #[test]
    fn test_edits_after_release_report_missing_grid() {
        let mut simulation = paused_with(3, 3, &[]);
        simulation.release();
        let err = simulation.randomize().unwrap_err();
        assert!(matches!(err, EngineError::Uninitialized));
        assert_eq!(err.to_string(), "no grid exists yet");
        assert!(simulation.set_cell_at(0, 0, Alive).is_err());
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        assert!(matches!(
            Simulation::new(0),
            Err(EngineError::InvalidConfig { key: "cell_size", .. })
        ));
        let grid = Grid::new(2, 2).unwrap();
        assert!(Simulation::with_grid(0, grid).is_err());
    }

    #[test]
    fn test_resize_restarts_from_generation_zero() {
        let mut simulation = Simulation::new(10).unwrap();
        simulation.resize(6, 6).unwrap();
        simulation.start().unwrap();
        simulation.step();
        simulation.step();
        assert_eq!(simulation.generation(), 2);

        simulation.resize(9, 4).unwrap();
        assert!(!simulation.is_running());
        simulation.start().unwrap();
        assert_eq!(simulation.generation(), 0);
        let snapshot = simulation.snapshot().unwrap();
        assert_eq!((snapshot.width, snapshot.height), (9, 4));
        assert_eq!(snapshot.cells.len(), 36);

        assert!(matches!(
            simulation.resize(0, 4),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_blinker() {
        let mut simulation = paused_with(4, 4, &[(1, 1), (1, 2), (1, 3)]);
        simulation.start().unwrap();
        assert!(simulation.step());

        assert_eq!(alive_cells(&simulation), vec![(0, 2), (1, 2), (2, 2)]);
        assert_eq!(simulation.alive_count(), 3);
        assert_eq!(simulation.dead_count(), 13);
        assert_eq!(simulation.generation(), 1);
    }

    #[test]
    fn test_transitions_in_context() {
        // (2, 2) is alive with neighbors (1, 1) and (1, 2).
        let mut simulation = paused_with(7, 7, &[(2, 2), (1, 1), (1, 2)]);
        simulation.start().unwrap();
        simulation.step();
        assert_eq!(simulation.grid().unwrap().get(2, 2), Some(Alive));

        // (3, 3) is alive with four neighbors.
        let mut simulation = paused_with(7, 7, &[(3, 3), (2, 2), (2, 4), (4, 2), (4, 4)]);
        simulation.start().unwrap();
        simulation.step();
        assert_eq!(simulation.grid().unwrap().get(3, 3), Some(Dead));

        // (3, 3) is dead with six neighbors.
        let six = [(2, 2), (2, 3), (2, 4), (4, 2), (4, 3), (4, 4)];
        let mut simulation = paused_with(7, 7, &six);
        simulation.start().unwrap();
        simulation.step();
        assert_eq!(simulation.grid().unwrap().get(3, 3), Some(Alive));

        // (3, 3) is dead with five neighbors.
        let five = [(2, 2), (2, 3), (2, 4), (4, 2), (4, 3)];
        let mut simulation = paused_with(7, 7, &five);
        simulation.start().unwrap();
        simulation.step();
        assert_eq!(simulation.grid().unwrap().get(3, 3), Some(Dead));
    }

    #[test]
    fn test_tally_invariant_holds_every_step() {
        let mut simulation = Simulation::new(10).unwrap();
        simulation.resize(23, 17).unwrap();
        simulation.start().unwrap();
        for _ in 0..40 {
            simulation.step();
            let snapshot = simulation.snapshot().unwrap();
            assert_eq!(snapshot.alive_count + snapshot.dead_count, 23 * 17);
            let counted = snapshot.cells.iter().filter(|cell| cell.is_alive()).count();
            assert_eq!(snapshot.alive_count, counted);
        }
    }

    #[test]
    fn test_generation_counts_steps_only() {
        let mut simulation = paused_with(5, 5, &[]);
        simulation.start().unwrap();
        for expected in 1..=5 {
            assert!(simulation.step());
            assert_eq!(simulation.generation(), expected);
        }

        simulation.pause();
        simulation.set_cell(12.0, 12.0);
        simulation.start().unwrap();
        simulation.pause();
        assert_eq!(simulation.generation(), 5);
    }

    #[test]
    fn test_step_is_noop_while_paused() {
        let mut simulation = paused_with(4, 4, &[(1, 1), (1, 2), (1, 3)]);
        assert!(!simulation.step());
        assert_eq!(simulation.generation(), 0);
        assert_eq!(alive_cells(&simulation), vec![(1, 1), (1, 2), (1, 3)]);

        let mut empty = Simulation::new(10).unwrap();
        empty.pause();
        assert!(!empty.step());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut simulation = paused_with(4, 4, &[(0, 0)]);
        simulation.start().unwrap();
        simulation.pause();
        let first = simulation.snapshot();
        simulation.pause();
        assert!(!simulation.is_running());
        assert_eq!(simulation.snapshot(), first);
    }

    #[test]
    fn test_repeated_edits_touch_one_cell() {
        let mut simulation = paused_with(6, 6, &[]);
        for _ in 0..5 {
            assert_eq!(simulation.set_cell(25.0, 31.0), Some((3, 2)));
        }
        assert_eq!(alive_cells(&simulation), vec![(3, 2)]);
        assert_eq!(simulation.alive_count(), 1);
        assert_eq!(simulation.dead_count(), 35);
    }

    #[test]
    fn test_set_cell_never_kills() {
        let mut simulation = paused_with(3, 3, &[(0, 0)]);
        assert_eq!(simulation.set_cell(4.0, 4.0), Some((0, 0)));
        assert_eq!(simulation.grid().unwrap().get(0, 0), Some(Alive));
        assert_eq!(simulation.alive_count(), 1);
    }

    #[test]
    fn test_pixel_mapping() {
        let simulation = paused_with(4, 3, &[]);
        assert_eq!(simulation.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(simulation.cell_at(9.4, 9.4), Some((0, 0)));
        // Coordinates are rounded before the division.
        assert_eq!(simulation.cell_at(9.6, 0.0), Some((0, 1)));
        assert_eq!(simulation.cell_at(39.0, 29.0), Some((2, 3)));
        assert_eq!(simulation.cell_at(40.0, 0.0), None);
        assert_eq!(simulation.cell_at(0.0, 30.0), None);
        assert_eq!(simulation.cell_at(-3.0, 5.0), None);
        assert_eq!(simulation.cell_at(f32::NAN, 5.0), None);
    }

    #[test]
    fn test_positions_left_of_board_are_not_truncated() {
        let simulation = paused_with(4, 4, &[]);
        // Integer truncation would put these on column and row 0.
        assert_eq!(simulation.cell_at(-5.0, 5.0), None);
        assert_eq!(simulation.cell_at(5.0, -9.0), None);
        assert_eq!(simulation.raw_cell(-5.0, -9.0), (-1.0, -1.0));
    }

    #[test]
    fn test_rejected_touch_reports_cell() {
        let simulation = paused_with(4, 3, &[]);
        assert_eq!(simulation.raw_cell(400.0, 25.0), (2.0, 40.0));
        assert_eq!(simulation.raw_cell(12.0, 31.0), (3.0, 1.0));
    }

    #[test]
    fn test_out_of_range_edit_is_ignored() {
        let mut simulation = paused_with(4, 4, &[(2, 2)]);
        let before = simulation.snapshot();
        assert_eq!(simulation.set_cell(400.0, 5.0), None);
        assert_eq!(simulation.set_cell(5.0, -20.0), None);
        assert_eq!(simulation.snapshot(), before);

        // Later events of the same drag still land.
        assert_eq!(simulation.set_cell(5.0, 5.0), Some((0, 0)));
        assert_eq!(simulation.alive_count(), 2);
    }

    #[test]
    fn test_set_cell_at_keeps_tally() {
        let mut simulation = paused_with(3, 3, &[]);
        simulation.set_cell_at(1, 1, Alive).unwrap();
        simulation.set_cell_at(1, 1, Alive).unwrap();
        assert_eq!((simulation.alive_count(), simulation.dead_count()), (1, 8));
        simulation.set_cell_at(1, 1, Dead).unwrap();
        assert_eq!((simulation.alive_count(), simulation.dead_count()), (0, 9));
        assert!(matches!(
            simulation.set_cell_at(3, 0, Alive),
            Err(EngineError::OutOfBounds { .. })
        ));
        assert!(matches!(
            Simulation::new(10).unwrap().set_cell_at(0, 0, Alive),
            Err(EngineError::Uninitialized)
        ));
    }

    #[test]
    fn test_randomize_resets_generation_and_keeps_state() {
        let mut simulation = paused_with(10, 10, &[]);
        simulation.start().unwrap();
        simulation.step();
        simulation.randomize().unwrap();
        assert_eq!(simulation.generation(), 0);
        assert!(simulation.is_running());
        assert_eq!(simulation.alive_count() + simulation.dead_count(), 100);

        assert!(matches!(
            Simulation::new(10).unwrap().randomize(),
            Err(EngineError::Uninitialized)
        ));
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut simulation = paused_with(4, 4, &[(1, 1), (1, 2), (1, 3)]);
        simulation.start().unwrap();
        let first = simulation.snapshot().unwrap();
        let second = simulation.snapshot().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.generation, 0);
        assert!(simulation.is_running());
    }
}
