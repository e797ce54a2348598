//! Shared trait abstractions for layers and controls

use crate::{
    core::{geo::LatLngBounds, viewport::Viewport},
    rendering::surface::MapSurface,
    ui::controls::Position,
    Result,
};

/// Operations every map layer supports
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name (as shown in the layer control)
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> crate::layers::base::LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// Draw the layer onto `surface`
    fn render(&self, surface: &mut dyn MapSurface, viewport: &Viewport) -> Result<()>;

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }
}

/// Screen-anchored widgets (layer switcher, legend)
pub trait Control {
    /// Corner the control is anchored to
    fn position(&self) -> Position;
}
