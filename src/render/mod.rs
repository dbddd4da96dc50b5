pub mod frame;
pub mod renderer;
pub mod surface;

pub use frame::{FrameRenderer, FrameView};
pub use renderer::Renderer;
pub use surface::{GridSurface, Marker, Surface};
