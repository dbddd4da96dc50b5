use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::engine::Engine;
use crate::game::{GameConfig, GameLoop, IntervalScheduler};
use crate::input::{InputHandler, KeyAction};
use crate::render::{FrameRenderer, FrameView, GridSurface};
use crate::score::HighScoreStore;

pub type TerminalLoop =
    GameLoop<Box<dyn Engine>, Box<dyn HighScoreStore>, GridSurface, IntervalScheduler>;

/// What the select loop should do after handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Restart,
    Quit,
}

/// Interactive play in the terminal
pub struct HumanMode {
    game: TerminalLoop,
    frame_renderer: FrameRenderer,
    input_handler: InputHandler,
}

impl HumanMode {
    /// Must be called inside a tokio runtime: starting the game arms its timer.
    pub fn new(
        config: GameConfig,
        engine: Box<dyn Engine>,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let surface = GridSurface::new(config.grid_size);
        let game = GameLoop::start(config, engine, store, surface, IntervalScheduler::new())
            .context("Failed to start game")?;

        Ok(Self {
            game,
            frame_renderer: FrameRenderer::new(),
            input_handler: InputHandler::new(),
        })
    }

    pub async fn run(self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Redraw at 30 FPS (33ms per frame); game ticks come from the loop's own scheduler
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            let control = tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                    None => Control::Quit,
                },

                // Game logic tick
                _ = self.game.scheduler_mut().tick() => {
                    self.game.tick();
                    Control::Continue
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal
                        .draw(|frame| self.draw(frame))
                        .context("Failed to draw frame")?;
                    Control::Continue
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => Control::Quit,
            };

            match control {
                Control::Continue => {}
                Control::Restart => {
                    info!(score = self.game.score(), "restarting");
                    self.game = self.game.restart().context("Failed to restart game")?;
                }
                Control::Quit => break,
            }
        }

        self.game.stop();
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Control {
        let Event::Key(key) = event else {
            return Control::Continue;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(input) => {
                self.game.on_key_event(&input);
                Control::Continue
            }
            KeyAction::Restart => Control::Restart,
            KeyAction::Quit => Control::Quit,
            KeyAction::None => Control::Continue,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let view = FrameView {
            surface: self.game.surface(),
            score: self.game.score(),
            high_score: self.game.high_score(),
            mode_label: self.game.config().speed.label(),
        };
        self.frame_renderer.draw(frame, &view);
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridEngine;
    use crate::game::{Direction, GameState, Scheduler, SpeedMode, MAX_GRID_SIZE};
    use crate::score::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(
            GameConfig::default(),
            Box::new(GridEngine::with_seed(11)),
            Box::new(MemoryStore::new()),
        )
        .unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.game.state(), GameState::Running);
        assert_eq!(mode.game.score(), 0);
        assert!(mode.game.scheduler().is_armed());
    }

    #[tokio::test]
    async fn test_steering_keys_reach_the_loop() {
        let mut mode = mode();
        assert_eq!(mode.handle_event(key(KeyCode::Char('d'))), Control::Continue);
        assert_eq!(mode.game.input().current_direction(), Direction::Right);
    }

    #[tokio::test]
    async fn test_release_events_ignored() {
        let mut mode = mode();
        let release = Event::Key(KeyEvent::new_with_kind_and_state(
            KeyCode::Down,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        ));
        mode.handle_event(release);
        assert_eq!(mode.game.input().current_direction(), Direction::None);
    }

    #[tokio::test]
    async fn test_control_keys() {
        let mut mode = mode();
        assert_eq!(mode.handle_event(key(KeyCode::Char('r'))), Control::Restart);
        assert_eq!(mode.handle_event(key(KeyCode::Esc)), Control::Quit);
        assert_eq!(mode.handle_event(Event::FocusLost), Control::Continue);
    }

    #[tokio::test]
    async fn test_oversized_grid_refused() {
        let result = HumanMode::new(
            GameConfig::new(MAX_GRID_SIZE + 1, SpeedMode::Normal),
            Box::new(GridEngine::with_seed(11)),
            Box::new(MemoryStore::new()),
        );
        assert!(result.is_err());
    }
}
