pub mod surface;

// Re-export main types
pub use surface::{DrawCommand, MapSurface, SceneRecorder, TilePlacement};
