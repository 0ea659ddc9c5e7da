/*!
* A toroidal two-state automaton under the B36/S23 rule:
* A live cell with two or three live neighbors lives on to the next generation.
* Any other live cell dies.
* A dead cell with exactly three or exactly six live neighbors comes alive.
* Grid edges wrap around, so every cell has eight neighbors.
*/

pub mod config;
pub mod error;
pub mod grid;
pub mod rule;
pub mod session;
pub mod simulation;
pub mod snapshot;
pub mod ticker;
pub mod worker;

pub use config::Config;
pub use error::{EngineError, SinkError};
pub use grid::{CellState, Grid, Tally};
pub use session::{Command, Session};
pub use simulation::{RunState, Simulation};
pub use snapshot::Snapshot;
pub use worker::{SnapshotSink, Worker};
