//! Current score and per-speed-mode high scores

pub mod store;
pub mod tracker;

pub use store::{FileStore, HighScoreStore, MemoryStore, StoreError};
pub use tracker::ScoreTracker;
