use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the square game grid
///
/// `row` and `col` travel as `x` and `y` on the engine wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "x")]
    pub row: i32,
    #[serde(rename = "y")]
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move cell by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// Check if the cell lies within a `grid_size` x `grid_size` grid
    pub fn is_in_bounds(&self, grid_size: usize) -> bool {
        // A side wider than i32 holds every non-negative coordinate
        let Ok(size) = i32::try_from(grid_size) else {
            return self.row >= 0 && self.col >= 0;
        };
        self.row >= 0 && self.row < size && self.col >= 0 && self.col < size
    }

    /// Surface address of this cell: `row * grid_size + col`.
    ///
    /// Returns `None` for cells outside the grid.
    pub fn id(&self, grid_size: usize) -> Option<usize> {
        if !self.is_in_bounds(grid_size) {
            return None;
        }
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        row.checked_mul(grid_size)?.checked_add(col)
    }
}

/// The snake, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snake {
    pub body: Vec<Cell>,
}

impl Snake {
    /// One-cell snake at `head`
    pub fn new(head: Cell) -> Self {
        Self { body: vec![head] }
    }

    pub fn from_cells(body: Vec<Cell>) -> Self {
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a live snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }
}

/// Lifecycle of one game loop. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Running,
    Failed,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        *self == GameState::Running
    }
}
