//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{MarkerStyleOptions, QuakeMapConfig, StyleProfile},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{FeedStatus, MapView, RenderReport, SkippedFeature},
    viewport::Viewport,
};

pub use crate::layers::{
    base::LayerTrait, group::LayerGroup, marker::CircleMarker, tile::TileLayer,
};

pub use crate::data::{
    earthquake::EarthquakeFeature,
    feed::{FeedMagnitude, FeedPeriod, FeedSource, HttpFeed, StaticFeed},
    geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
};

#[cfg(feature = "tokio-runtime")]
pub use crate::data::refresh::FeedRefresher;

pub use crate::style::{
    classifier::{classify, ColorBin, DepthScale},
    color::HexColor,
    legend::{legend_entries, LegendEntry},
    marker::{style_feature, MarkerStyle},
    scaler::radius,
};

pub use crate::rendering::surface::{DrawCommand, MapSurface, SceneRecorder, TilePlacement};

pub use crate::spatial::index::{SpatialIndex, SpatialItem};

pub use crate::traits::Control;

pub use crate::ui::{
    controls::{LayerControl, LayerControlEntry, LayerKind, Position},
    legend::LegendControl,
    popup::{Popup, PopupManager},
};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
