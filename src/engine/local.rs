use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{AdvanceRequest, AdvanceResponse, Engine, EngineError};
use crate::game::{Cell, Direction, Snake};

/// Random draws tried before falling back to listing the free cells
const SAMPLE_ATTEMPTS: usize = 64;

/// Pick a uniformly random cell not covered by the snake
pub(crate) fn random_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    snake: &Snake,
    grid_size: usize,
) -> Option<Cell> {
    let size = i32::try_from(grid_size).ok().filter(|s| *s > 0)?;

    for _ in 0..SAMPLE_ATTEMPTS {
        let cell = Cell::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !snake.contains(cell) {
            return Some(cell);
        }
    }

    // Crowded board: choose among the cells that are actually free
    let free: Vec<Cell> = (0..size)
        .flat_map(|row| (0..size).map(move |col| Cell::new(row, col)))
        .filter(|cell| !snake.contains(*cell))
        .collect();
    free.choose(rng).copied()
}

/// In-process movement, collision and fruit engine
pub struct GridEngine {
    rng: StdRng,
}

impl GridEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic fruit placement for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for GridEngine {
    fn advance(&mut self, request: &AdvanceRequest) -> Result<AdvanceResponse, EngineError> {
        let mut snake = request.snake.clone();
        let head = snake
            .head()
            .ok_or_else(|| EngineError::InvalidRequest("snake is empty".into()))?;

        // Resting snake: nothing moves until the first direction arrives.
        if request.direction == Direction::None {
            return Ok(AdvanceResponse {
                failed: false,
                got_fruit: false,
                snake,
                fruit: request.fruit,
            });
        }

        let new_head = head.moved_in_direction(request.direction);

        // The whole body counts, tail included: it has not moved out yet.
        if !new_head.is_in_bounds(request.grid_size) || snake.contains(new_head) {
            return Ok(AdvanceResponse {
                failed: true,
                got_fruit: false,
                snake,
                fruit: request.fruit,
            });
        }

        snake.body.insert(0, new_head);

        let mut fruit = request.fruit;
        let got_fruit = new_head == fruit;
        if got_fruit {
            // A full board has nowhere to put the fruit; leave it under the head.
            if let Some(cell) = random_free_cell(&mut self.rng, &snake, request.grid_size) {
                fruit = cell;
            }
        } else {
            snake.body.pop();
        }

        Ok(AdvanceResponse {
            failed: false,
            got_fruit,
            snake,
            fruit,
        })
    }

    fn place_fruit(&mut self, snake: &Snake, grid_size: usize) -> Result<Cell, EngineError> {
        random_free_cell(&mut self.rng, snake, grid_size).ok_or(EngineError::BoardFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Vec<Cell>, fruit: Cell, direction: Direction) -> AdvanceRequest {
        AdvanceRequest {
            snake: Snake::from_cells(body),
            fruit,
            grid_size: 10,
            direction,
        }
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GridEngine::with_seed(7);
        let resp = engine
            .advance(&request(vec![Cell::new(0, 0)], Cell::new(5, 5), Direction::Right))
            .unwrap();

        assert!(!resp.failed);
        assert!(!resp.got_fruit);
        assert_eq!(resp.snake.cells(), &[Cell::new(0, 1)]);
        assert_eq!(resp.fruit, Cell::new(5, 5));
    }

    #[test]
    fn test_resting_snake_does_not_move() {
        let mut engine = GridEngine::with_seed(7);
        let resp = engine
            .advance(&request(vec![Cell::new(0, 0)], Cell::new(0, 0), Direction::None))
            .unwrap();

        assert!(!resp.failed);
        assert!(!resp.got_fruit);
        assert_eq!(resp.snake.cells(), &[Cell::new(0, 0)]);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GridEngine::with_seed(7);
        let resp = engine
            .advance(&request(
                vec![Cell::new(2, 2), Cell::new(2, 1)],
                Cell::new(2, 3),
                Direction::Right,
            ))
            .unwrap();

        assert!(resp.got_fruit);
        assert_eq!(
            resp.snake.cells(),
            &[Cell::new(2, 3), Cell::new(2, 2), Cell::new(2, 1)]
        );
        assert!(!resp.snake.contains(resp.fruit));
        assert!(resp.fruit.is_in_bounds(10));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = GridEngine::with_seed(7);
        let resp = engine
            .advance(&request(vec![Cell::new(0, 5)], Cell::new(5, 5), Direction::Up))
            .unwrap();
        assert!(resp.failed);
        assert!(!resp.got_fruit);

        let resp = engine
            .advance(&request(vec![Cell::new(3, 9)], Cell::new(5, 5), Direction::Right))
            .unwrap();
        assert!(resp.failed);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GridEngine::with_seed(7);
        // Head at (5,5) turning up into its own body at (4,5)
        let body = vec![
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(4, 6),
            Cell::new(4, 5),
            Cell::new(4, 4),
        ];
        let resp = engine
            .advance(&request(body, Cell::new(8, 8), Direction::Up))
            .unwrap();
        assert!(resp.failed);
    }

    #[test]
    fn test_empty_snake_rejected() {
        let mut engine = GridEngine::with_seed(7);
        let err = engine
            .advance(&request(vec![], Cell::new(1, 1), Direction::Up))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[test]
    fn test_full_board_keeps_fruit() {
        let mut engine = GridEngine::with_seed(7);
        let req = AdvanceRequest {
            snake: Snake::from_cells(vec![Cell::new(0, 0)]),
            fruit: Cell::new(0, 1),
            grid_size: 2,
            direction: Direction::Right,
        };
        // 2x2 grid: after eating, 2 of 4 cells are covered, so a free cell exists
        let resp = engine.advance(&req).unwrap();
        assert!(resp.got_fruit);
        assert!(!resp.snake.contains(resp.fruit));

        let crowded = Snake::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(1, 1),
            Cell::new(1, 0),
        ]);
        assert!(matches!(
            engine.place_fruit(&crowded, 2),
            Err(EngineError::BoardFull)
        ));
    }

    #[test]
    fn test_last_free_cell_is_found() {
        let mut engine = GridEngine::with_seed(9);
        let crowded = Snake::from_cells(vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(1, 1),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(2, 1),
        ]);
        for _ in 0..10 {
            assert_eq!(engine.place_fruit(&crowded, 3).unwrap(), Cell::new(2, 2));
        }
    }

    #[test]
    fn test_place_fruit_avoids_snake() {
        let mut engine = GridEngine::with_seed(42);
        let snake = Snake::new(Cell::new(0, 0));
        for _ in 0..50 {
            let fruit = engine.place_fruit(&snake, 3).unwrap();
            assert_ne!(fruit, Cell::new(0, 0));
            assert!(fruit.is_in_bounds(3));
        }
    }
}
