#[macro_use]
pub mod macros;

pub mod base;
pub mod group;
pub mod marker;
pub mod tile;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use group::LayerGroup;
pub use marker::CircleMarker;
pub use tile::TileLayer;
