//! Translation of display and pointer events into controller calls.

use log::{debug, warn};

use crate::config::Config;
use crate::error::EngineError;
use crate::simulation::Simulation;
use crate::snapshot::Snapshot;

/// Inbound events from the display/input side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// The drawing area is now `width` x `height` pixels.
    Resize { width: u32, height: u32 },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Pause,
    Resume,
    Randomize,
    /// The drawing area went away.
    Destroyed,
    /// Stop the worker thread.
    Shutdown,
}

pub struct Session {
    config: Config,
    simulation: Simulation,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Session {
            simulation: Simulation::new(config.cell_size)?,
            config,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.simulation.snapshot()
    }

    /// Applies one command. Returns `true` when the visible grid changed and
    /// a fresh snapshot should go out.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Resize { width, height } => self.resize(width, height),
            Command::PointerDown { x, y } | Command::PointerMove { x, y } => {
                self.simulation.pause();
                self.simulation.set_cell(x, y).is_some()
            }
            Command::PointerUp | Command::Resume => {
                self.resume();
                false
            }
            Command::Pause => {
                self.simulation.pause();
                false
            }
            Command::Randomize => match self.simulation.randomize() {
                Ok(()) => true,
                Err(err) => {
                    debug!("randomize ignored: {err}");
                    false
                }
            },
            Command::Destroyed => {
                debug!("drawing area destroyed, releasing grid");
                self.simulation.release();
                false
            }
            Command::Shutdown => {
                self.simulation.pause();
                false
            }
        }
    }

    /// One scheduled step. Returns `true` if a generation was produced.
    pub fn tick(&mut self) -> bool {
        self.simulation.step()
    }

    fn resize(&mut self, width: u32, height: u32) -> bool {
        let cell_size = self.config.cell_size;
        let columns = (width / cell_size) as usize;
        let rows = (height / cell_size) as usize;
        if let Err(err) = self.simulation.resize(columns, rows) {
            warn!("drawing area {width}x{height} px holds no whole {cell_size} px cell: {err}");
            self.simulation.release();
            return false;
        }
        match self.simulation.start() {
            Ok(()) => true,
            Err(err) => {
                warn!("could not start after resize: {err}");
                false
            }
        }
    }

    fn resume(&mut self) {
        if let Err(err) = self.simulation.start() {
            debug!("resume ignored: {err}");
        }
    }
}
