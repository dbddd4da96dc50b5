//! The tick-driven game loop
//!
//! One [`GameLoop`] is one game. It starts `Running`, advances once per
//! scheduler tick, and moves to `Failed` exactly once, after which it ignores
//! ticks and key presses. A new game is a new `GameLoop`.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::{ConfigError, GameConfig};
use super::scheduler::Scheduler;
use super::state::{Cell, GameState, Snake};
use crate::engine::{AdvanceRequest, Engine, EngineError};
use crate::input::{InputMapper, KeyInput};
use crate::render::{Renderer, Surface};
use crate::score::{HighScoreStore, ScoreTracker};

/// Why a game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailReason {
    /// The snake hit a wall or itself
    Collision,
    /// The engine could not be reached or answered nonsense
    Engine(String),
    /// Stopped from outside
    Stopped,
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced { got_fruit: bool },
    Failed(FailReason),
    /// The loop had already ended; nothing ran
    Halted,
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not place the first fruit: {0}")]
    Engine(#[from] EngineError),
}

pub struct GameLoop<E, S, U, C> {
    config: GameConfig,
    engine: E,
    surface: U,
    scheduler: C,
    input: InputMapper,
    score: ScoreTracker<S>,
    renderer: Renderer,
    snake: Snake,
    fruit: Cell,
    state: GameState,
    fail_reason: Option<FailReason>,
    ticks: u64,
}

impl<E, S, U, C> GameLoop<E, S, U, C>
where
    E: Engine,
    S: HighScoreStore,
    U: Surface,
    C: Scheduler,
{
    /// Start a new game: one-cell snake at (0, 0), a fresh fruit, score 0,
    /// the stored high score for this speed mode, first frame drawn, timer
    /// armed.
    pub fn start(
        config: GameConfig,
        mut engine: E,
        store: S,
        mut surface: U,
        mut scheduler: C,
    ) -> Result<Self, LoopError> {
        config.validate()?;

        let snake = Snake::new(Cell::new(0, 0));
        let fruit = engine.place_fruit(&snake, config.grid_size)?;
        let score = ScoreTracker::new(store, config.high_score_key());

        surface.clear();
        let mut renderer = Renderer::new(config.grid_size);
        renderer.render(&mut surface, &HashSet::new(), &occupied(&snake), fruit);

        scheduler.arm(config.tick_interval());

        info!(
            grid_size = config.grid_size,
            speed = ?config.speed,
            high_score = score.current_high_score(),
            "game started"
        );

        Ok(Self {
            config,
            engine,
            surface,
            scheduler,
            input: InputMapper::new(),
            score,
            renderer,
            snake,
            fruit,
            state: GameState::Running,
            fail_reason: None,
            ticks: 0,
        })
    }

    /// Start a fresh game with the same collaborators.
    pub fn restart(self) -> Result<Self, LoopError> {
        let Self {
            config,
            engine,
            surface,
            mut scheduler,
            score,
            ..
        } = self;
        scheduler.disarm();
        Self::start(config, engine, score.into_store(), surface, scheduler)
    }

    /// Feed a key press to the direction mapper. Ignored once the game ended.
    pub fn on_key_event(&mut self, event: &KeyInput) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.input.on_key_event(event)
    }

    /// Run one step of the game.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Halted;
        }

        let direction = self.input.commit();
        let request = AdvanceRequest {
            snake: self.snake.clone(),
            fruit: self.fruit,
            grid_size: self.config.grid_size,
            direction,
        };

        let response = match self
            .engine
            .advance(&request)
            .and_then(|r| r.validated(self.config.grid_size))
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, tick = self.ticks, "engine step failed");
                return self.fail(FailReason::Engine(err.to_string()));
            }
        };

        // A failed move ends the game even if it also reached the fruit
        if response.failed {
            return self.fail(FailReason::Collision);
        }

        let previous = occupied(&self.snake);
        self.snake = response.snake;
        self.fruit = response.fruit;

        if response.got_fruit {
            self.score.on_fruit_eaten();
        }

        self.renderer
            .render(&mut self.surface, &previous, &occupied(&self.snake), self.fruit);

        self.ticks += 1;
        debug!(
            tick = self.ticks,
            ?direction,
            length = self.snake.len(),
            got_fruit = response.got_fruit,
            "tick"
        );

        TickOutcome::Advanced {
            got_fruit: response.got_fruit,
        }
    }

    /// End the game from outside. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.state.is_running() {
            self.fail(FailReason::Stopped);
        } else {
            self.scheduler.disarm();
        }
    }

    fn fail(&mut self, reason: FailReason) -> TickOutcome {
        self.state = GameState::Failed;
        self.scheduler.disarm();
        self.surface.set_game_over(true);

        info!(
            reason = ?reason,
            score = self.score.current_score(),
            high_score = self.score.current_high_score(),
            ticks = self.ticks,
            "game over"
        );

        self.fail_reason = Some(reason.clone());
        TickOutcome::Failed(reason)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn fail_reason(&self) -> Option<&FailReason> {
        self.fail_reason.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> Cell {
        self.fruit
    }

    pub fn score(&self) -> u64 {
        self.score.current_score()
    }

    pub fn high_score(&self) -> u64 {
        self.score.current_high_score()
    }

    pub fn score_tracker(&self) -> &ScoreTracker<S> {
        &self.score
    }

    pub fn input(&self) -> &InputMapper {
        &self.input
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut C {
        &mut self.scheduler
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Hand back the high-score store, e.g. to start a later session with it
    pub fn into_store(self) -> S {
        self.score.into_store()
    }
}

fn occupied(snake: &Snake) -> HashSet<Cell> {
    snake.cells().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridEngine;
    use crate::game::{Direction, ManualScheduler, SpeedMode};
    use crate::render::{GridSurface, Marker};
    use crate::score::MemoryStore;

    type TestLoop = GameLoop<GridEngine, MemoryStore, GridSurface, ManualScheduler>;

    fn start(grid_size: usize) -> TestLoop {
        GameLoop::start(
            GameConfig::new(grid_size, SpeedMode::Speed),
            GridEngine::with_seed(3),
            MemoryStore::new(),
            GridSurface::new(grid_size),
            ManualScheduler::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let game = start(10);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score(), 0);
        assert_eq!(game.snake().cells(), &[Cell::new(0, 0)]);
        assert_ne!(game.fruit(), Cell::new(0, 0));
        assert_eq!(game.scheduler().interval(), Some(SpeedMode::Speed.tick_interval()));
        assert_eq!(game.surface().cells_with(Marker::Snake), vec![0]);
        assert_eq!(game.surface().cells_with(Marker::Fruit).len(), 1);
    }

    #[test]
    fn test_resting_ticks_do_nothing() {
        let mut game = start(10);
        assert_eq!(game.tick(), TickOutcome::Advanced { got_fruit: false });
        assert_eq!(game.snake().cells(), &[Cell::new(0, 0)]);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = start(10);
        game.on_key_event(&KeyInput::new("w"));
        assert_eq!(game.tick(), TickOutcome::Failed(FailReason::Collision));
        assert_eq!(game.state(), GameState::Failed);
        assert!(!game.scheduler().is_armed());
        assert!(game.surface().is_game_over());
        assert_eq!(game.tick(), TickOutcome::Halted);
    }

    #[test]
    fn test_keys_ignored_after_game_over() {
        let mut game = start(10);
        game.stop();
        assert!(!game.on_key_event(&KeyInput::new("d")));
        assert_eq!(game.input().current_direction(), Direction::None);
    }

    #[test]
    fn test_restart_builds_fresh_game() {
        let mut game = start(10);
        game.on_key_event(&KeyInput::new("w"));
        game.tick();
        assert_eq!(game.state(), GameState::Failed);

        let game = game.restart().unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.ticks(), 0);
        assert!(game.scheduler().is_armed());
        assert!(!game.surface().is_game_over());
        assert_eq!(game.input().current_direction(), Direction::None);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let result = GameLoop::start(
            GameConfig::new(0, SpeedMode::Normal),
            GridEngine::with_seed(3),
            MemoryStore::new(),
            GridSurface::new(0),
            ManualScheduler::new(),
        );
        assert!(matches!(result, Err(LoopError::Config(_))));
    }

    #[test]
    fn test_oversized_grid_rejected_before_setup() {
        let grid_size = crate::game::MAX_GRID_SIZE + 1;
        let result = GameLoop::start(
            GameConfig::new(grid_size, SpeedMode::Normal),
            GridEngine::with_seed(3),
            MemoryStore::new(),
            GridSurface::new(grid_size),
            ManualScheduler::new(),
        );
        assert!(matches!(result, Err(LoopError::Config(_))));
    }
}
