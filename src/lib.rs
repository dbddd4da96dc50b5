//! Tick Snake - a timer-driven grid snake game
//!
//! This library provides:
//! - The game loop state machine and its scheduler (game module)
//! - The engine boundary, an in-process engine and a JSON line protocol (engine module)
//! - Key-to-direction mapping (input module)
//! - Score and per-speed-mode high score tracking (score module)
//! - Diff rendering onto a cell surface and a TUI frame (render module)
//! - The interactive terminal mode (modes module)

pub mod engine;
pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod score;
