//! # quakemap
//!
//! Earthquake map model inspired by Leaflet.
//!
//! The crate turns a USGS-style GeoJSON earthquake feed into styled circle
//! markers (color by depth, size by magnitude), popups and a depth legend.
//! Drawing is delegated to a [`MapSurface`] supplied by a front-end, so the
//! same map model can back a desktop viewer, a headless renderer or tests.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod spatial;
pub mod style;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::MapBuilder,
    config::{MarkerStyleOptions, QuakeMapConfig, StyleProfile},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{FeedStatus, MapView, RenderReport, SkippedFeature},
    viewport::Viewport,
};

pub use data::{
    earthquake::EarthquakeFeature,
    feed::{FeedMagnitude, FeedPeriod, FeedSource, HttpFeed, StaticFeed},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
};

#[cfg(feature = "tokio-runtime")]
pub use data::refresh::FeedRefresher;

pub use layers::{base::LayerTrait, group::LayerGroup, marker::CircleMarker, tile::TileLayer};

pub use rendering::surface::{DrawCommand, MapSurface, SceneRecorder, TilePlacement};

pub use spatial::index::SpatialIndex;

pub use style::{
    classifier::{classify, ColorBin, DepthScale},
    color::HexColor,
    legend::{legend_entries, LegendEntry},
    marker::{style_feature, MarkerStyle},
    scaler::radius,
};

pub use ui::{
    controls::{LayerControl, LayerControlEntry, Position},
    legend::LegendControl,
    popup::{Popup, PopupManager},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Earthquake feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Malformed feature #{index}: {reason}")]
    MalformedFeature { index: usize, reason: String },

    #[error("Invalid depth scale: {0}")]
    InvalidScale(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(String),
}

impl MapError {
    /// Errors that only affect a single feature and never abort a render pass.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MapError::MalformedFeature { .. })
    }
}

/// Error type alias for convenience
pub type Error = MapError;
