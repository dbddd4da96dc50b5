//! Boundary to the movement/collision engine
//!
//! The game loop only knows the request/response contract below. The engine
//! itself can live in-process ([`GridEngine`]), behind a JSON line protocol in
//! a child process ([`JsonEngine`] over [`ProcessTransport`]), or anywhere else
//! that implements [`Engine`].

pub mod local;
pub mod wire;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{Cell, Direction, Snake};

pub use local::GridEngine;
pub use wire::{serve_lines, JsonEngine, ProcessTransport, Transport};

/// What the loop sends the engine every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub snake: Snake,
    pub fruit: Cell,
    pub grid_size: usize,
    pub direction: Direction,
}

/// What the engine answers
///
/// When `failed` is set, `snake` and `fruit` carry no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub failed: bool,
    pub got_fruit: bool,
    pub snake: Snake,
    pub fruit: Cell,
}

impl AdvanceResponse {
    /// Reject responses the loop cannot adopt as its next state.
    pub fn validated(self, grid_size: usize) -> Result<Self, EngineError> {
        if self.failed {
            return Ok(self);
        }
        if self.snake.is_empty() {
            return Err(EngineError::Malformed("snake is empty".into()));
        }
        if let Some(cell) = self.snake.cells().iter().find(|c| !c.is_in_bounds(grid_size)) {
            return Err(EngineError::Malformed(format!(
                "snake cell ({}, {}) is outside a {grid_size}x{grid_size} grid",
                cell.row, cell.col
            )));
        }
        if !self.fruit.is_in_bounds(grid_size) {
            return Err(EngineError::Malformed(format!(
                "fruit ({}, {}) is outside a {grid_size}x{grid_size} grid",
                self.fruit.row, self.fruit.col
            )));
        }
        Ok(self)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed engine response: {0}")]
    Malformed(String),
    #[error("invalid engine request: {0}")]
    InvalidRequest(String),
    #[error("engine reported an error: {0}")]
    Remote(String),
    #[error("engine transport failed: {0}")]
    Transport(String),
    #[error("no free cell left for the fruit")]
    BoardFull,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Movement/collision engine capability
pub trait Engine {
    /// Compute the next snake and fruit for one tick.
    fn advance(&mut self, request: &AdvanceRequest) -> Result<AdvanceResponse, EngineError>;

    /// Choose the opening fruit cell, off the snake.
    fn place_fruit(&mut self, snake: &Snake, grid_size: usize) -> Result<Cell, EngineError> {
        local::random_free_cell(&mut rand::thread_rng(), snake, grid_size)
            .ok_or(EngineError::BoardFull)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn advance(&mut self, request: &AdvanceRequest) -> Result<AdvanceResponse, EngineError> {
        (**self).advance(request)
    }

    fn place_fruit(&mut self, snake: &Snake, grid_size: usize) -> Result<Cell, EngineError> {
        (**self).place_fruit(snake, grid_size)
    }
}
