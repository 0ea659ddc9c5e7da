//! Display and timing constants shared by the engine and its front ends.

use std::time::Duration;

use crate::error::EngineError;

pub const DEFAULT_CELL_SIZE: u32 = 10;
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(50);
pub const ALIVE_COLOR: [u8; 3] = [0xFF, 0x00, 0x00];
pub const DEAD_COLOR: [u8; 3] = [0x00, 0xFF, 0x00];

const CELL_SIZE_VAR: &str = "LIFEGAME_CELL_SIZE";
const STEP_MS_VAR: &str = "LIFEGAME_STEP_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Edge length of one cell in pixels.
    pub cell_size: u32,
    /// Delay between the end of one step and the start of the next.
    pub step_interval: Duration,
    pub alive_color: [u8; 3],
    pub dead_color: [u8; 3],
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cell_size: DEFAULT_CELL_SIZE,
            step_interval: DEFAULT_STEP_INTERVAL,
            alive_color: ALIVE_COLOR,
            dead_color: DEAD_COLOR,
        }
    }
}

impl Config {
    /// Defaults overridden by `LIFEGAME_CELL_SIZE` and `LIFEGAME_STEP_MS`.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(value) = lookup(CELL_SIZE_VAR) {
            config.cell_size = parse_positive(CELL_SIZE_VAR, &value)?;
        }
        if let Some(value) = lookup(STEP_MS_VAR) {
            config.step_interval = Duration::from_millis(parse_positive(STEP_MS_VAR, &value)?.into());
        }
        Ok(config)
    }

    /// Rejects a zero cell size or step interval.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.cell_size == 0 {
            return Err(EngineError::InvalidConfig {
                key: "cell_size",
                value: self.cell_size.to_string(),
            });
        }
        if self.step_interval.is_zero() {
            return Err(EngineError::InvalidConfig {
                key: "step_interval",
                value: format!("{:?}", self.step_interval),
            });
        }
        Ok(())
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, EngineError> {
    match value.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(EngineError::InvalidConfig {
            key,
            value: value.to_owned(),
        }),
    }
}
