pub mod handler;

pub use handler::{InputHandler, InputMapper, KeyAction, KeyInput};
