//! Core game loop for Snake
//!
//! The loop owns the tick, the snake/fruit it adopted from the engine, and the
//! Running/Failed state. Movement, collisions and fruit placement are the
//! engine's business (see [`crate::engine`]).

pub mod action;
pub mod config;
pub mod game_loop;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig, SpeedMode, GRID_SIZE, MAX_GRID_SIZE};
pub use game_loop::{FailReason, GameLoop, LoopError, TickOutcome};
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler};
pub use state::{Cell, GameState, Snake};
