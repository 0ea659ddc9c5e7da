use thiserror::Error;

/// Errors raised by the automaton engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("no grid exists yet")]
    Uninitialized,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("simulation worker has stopped")]
    WorkerStopped,

    #[error("failed to spawn simulation worker")]
    Spawn(#[from] std::io::Error),
}

/// Failure to hand a snapshot to the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("render surface is not available")]
    SurfaceUnavailable,
}
