//! Configuration for feed access, marker styling and map setup
//!
//! Marker styling comes in presets ([`StyleProfile`]) that resolve into
//! concrete [`MarkerStyleOptions`], mirroring how the radius multiplier was
//! tuned per deployment. Everything can be loaded from a JSON file; missing
//! fields take their defaults.

use crate::{
    constants::{
        DEFAULT_CENTER, DEFAULT_FEED_URL, DEFAULT_FILL_OPACITY, DEFAULT_RADIUS_MULTIPLIER,
        DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WEIGHT, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM,
    },
    core::geo::LatLng,
    style::{classifier::DepthScale, color::HexColor},
    ui::controls::Position,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProfile {
    /// Radius = magnitude × 4
    Standard,
    /// Radius = magnitude × 2, for dense feeds
    Compact,
    /// Radius = magnitude × 5
    Large,
    Custom(MarkerStyleOptions),
}

impl StyleProfile {
    pub fn resolve(&self) -> MarkerStyleOptions {
        let multiplier = match self {
            Self::Standard => DEFAULT_RADIUS_MULTIPLIER,
            Self::Compact => 2.0,
            Self::Large => 5.0,
            Self::Custom(options) => return options.clone(),
        };
        MarkerStyleOptions {
            radius_multiplier: multiplier,
            ..MarkerStyleOptions::default()
        }
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyleOptions {
    pub radius_multiplier: f64,
    pub stroke_weight: f64,
    pub stroke_color: HexColor,
    pub fill_opacity: f64,
}

impl Default for MarkerStyleOptions {
    fn default() -> Self {
        Self {
            radius_multiplier: DEFAULT_RADIUS_MULTIPLIER,
            stroke_weight: DEFAULT_STROKE_WEIGHT,
            stroke_color: HexColor::parse(DEFAULT_STROKE_COLOR).unwrap_or(HexColor::rgb(255, 0, 0)),
            fill_opacity: DEFAULT_FILL_OPACITY,
        }
    }
}

impl MarkerStyleOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius_multiplier.is_finite() && self.radius_multiplier > 0.0) {
            return Err(MapError::Config(format!(
                "radius_multiplier must be positive, got {}",
                self.radius_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(MapError::Config(format!(
                "fill_opacity must be within [0, 1], got {}",
                self.fill_opacity
            )));
        }
        if self.stroke_weight.is_nan() || self.stroke_weight < 0.0 {
            return Err(MapError::Config(format!(
                "stroke_weight must not be negative, got {}",
                self.stroke_weight
            )));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuakeMapConfig {
    pub feed_url: String,
    pub center: LatLng,
    pub zoom: f64,
    pub style_profile: StyleProfile,
    pub depth_scale: DepthScale,
    pub legend_position: Position,
    /// Also show the `≤<first>` row in the legend
    pub legend_floor_entry: bool,
    pub layer_control_collapsed: bool,
    /// Re-fetch period; `None` fetches once
    pub refresh_interval_secs: Option<u64>,
}

impl Default for QuakeMapConfig {
    fn default() -> Self {
        let (lat, lng) = DEFAULT_CENTER;
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            center: LatLng::new(lat, lng),
            zoom: DEFAULT_ZOOM,
            style_profile: StyleProfile::default(),
            depth_scale: DepthScale::default(),
            legend_position: Position::BottomRight,
            legend_floor_entry: false,
            layer_control_collapsed: false,
            refresh_interval_secs: None,
        }
    }
}

impl QuakeMapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed_url.trim().is_empty() {
            return Err(MapError::Config("feed_url is empty".into()));
        }
        if !self.center.is_valid() {
            return Err(MapError::Config(format!(
                "center {:?} is outside valid coordinates",
                self.center
            )));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(MapError::Config(format!(
                "zoom must be within [{MIN_ZOOM}, {MAX_ZOOM}], got {}",
                self.zoom
            )));
        }
        if self.refresh_interval_secs == Some(0) {
            return Err(MapError::Config("refresh_interval_secs must be > 0".into()));
        }
        self.style_profile.resolve().validate()
    }

    pub fn marker_style(&self) -> MarkerStyleOptions {
        self.style_profile.resolve()
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }
}
