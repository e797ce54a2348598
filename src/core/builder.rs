//! Map builder for fluent API configuration
//!
//! This module provides a MapBuilder that allows for fluent configuration
//! of [`MapView`] instances on top of a [`QuakeMapConfig`].

use crate::{
    core::{
        config::{QuakeMapConfig, StyleProfile},
        geo::LatLng,
        map::MapView,
    },
    layers::tile::TileLayer,
    style::classifier::DepthScale,
    ui::controls::Position,
    Result,
};

/// Builder for creating and configuring MapView instances
pub struct MapBuilder {
    config: QuakeMapConfig,
    /// Replaces the default Street/Topographic pair when non-empty
    base_layers: Vec<TileLayer>,
    active_base: Option<String>,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        Self {
            config: QuakeMapConfig::default(),
            base_layers: Vec::new(),
            active_base: None,
        }
    }

    /// Start from a loaded configuration
    pub fn with_config(mut self, config: QuakeMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64) -> Self {
        self.config.center = center;
        self.config.zoom = zoom;
        self
    }

    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.config.feed_url = url.into();
        self
    }

    pub fn with_style_profile(mut self, profile: StyleProfile) -> Self {
        self.config.style_profile = profile;
        self
    }

    pub fn with_depth_scale(mut self, scale: DepthScale) -> Self {
        self.config.depth_scale = scale;
        self
    }

    pub fn with_legend_position(mut self, position: Position) -> Self {
        self.config.legend_position = position;
        self
    }

    pub fn with_legend_floor_entry(mut self, enabled: bool) -> Self {
        self.config.legend_floor_entry = enabled;
        self
    }

    pub fn with_layer_control_collapsed(mut self, collapsed: bool) -> Self {
        self.config.layer_control_collapsed = collapsed;
        self
    }

    /// Add a base layer. The first call drops the default base layers.
    pub fn with_base_layer(mut self, layer: TileLayer) -> Self {
        self.base_layers.push(layer);
        self
    }

    /// Base layer shown initially (defaults to the first one)
    pub fn with_active_base_layer(mut self, name: impl Into<String>) -> Self {
        self.active_base = Some(name.into());
        self
    }

    pub fn build(self) -> Result<MapView> {
        self.config.validate()?;

        let base_layers = if self.base_layers.is_empty() {
            vec![TileLayer::openstreetmap(), TileLayer::opentopomap()]
        } else {
            self.base_layers
        };

        let mut map = MapView::with_base_layers(self.config, base_layers)?;
        if let Some(name) = self.active_base {
            map.select_base_layer(&name)?;
        }
        Ok(map)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
