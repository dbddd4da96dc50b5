use std::time::Duration;

use thiserror::Error;

/// Side length of the square grid
pub const GRID_SIZE: usize = 20;

/// Largest grid side the game accepts
pub const MAX_GRID_SIZE: usize = 1024;

/// Pace of the game; also the namespace for high scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum SpeedMode {
    /// 200ms per tick
    #[default]
    Normal,
    /// 100ms per tick
    Speed,
    /// 50ms per tick
    Ahhh,
}

impl SpeedMode {
    /// Pick the mode for a page route (`/speed`, `/ahhh`, anything else)
    pub fn from_route(path: &str) -> Self {
        match path {
            "/speed" => SpeedMode::Speed,
            "/ahhh" => SpeedMode::Ahhh,
            _ => SpeedMode::Normal,
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            SpeedMode::Normal => 200,
            SpeedMode::Speed => 100,
            SpeedMode::Ahhh => 50,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    /// Opaque mode identifier used to namespace persisted scores
    pub fn key(&self) -> String {
        self.tick_interval_ms().to_string()
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedMode::Normal => "Normal speed",
            SpeedMode::Speed => "Speedi speed",
            SpeedMode::Ahhh => "Ahhh speed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be at least 1, got {0}")]
    InvalidGridSize(usize),
    #[error("grid size must be at most {max}, got {0}", max = MAX_GRID_SIZE)]
    GridTooLarge(usize),
}

/// Configuration for one game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Speed mode (tick interval and high-score namespace)
    pub speed: SpeedMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            speed: SpeedMode::default(),
        }
    }
}

impl GameConfig {
    pub fn new(grid_size: usize, speed: SpeedMode) -> Self {
        Self { grid_size, speed }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        self.speed.tick_interval()
    }

    /// Persistence key for this mode's high score, e.g. `hs200`
    pub fn high_score_key(&self) -> String {
        format!("hs{}", self.speed.key())
    }
}
