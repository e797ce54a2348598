//! Core constants derived from the USGS feed conventions and Leaflet defaults.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Initial map center (contiguous United States).
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);

/// Initial zoom level.
pub const DEFAULT_ZOOM: f64 = 5.0;

/// Zoom limits shared by the viewport and tile layers.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;

/// All earthquakes from the past seven days.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Root of the USGS summary feeds.
pub const USGS_SUMMARY_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// Depth breakpoints in km; one more color than breakpoints.
pub const DEPTH_BREAKPOINTS: [f64; 5] = [1.0, 3.0, 5.0, 10.0, 20.0];

/// Sequential yellow-to-dark-red ramp, shallow to deep.
pub const DEPTH_COLORS: [&str; 6] = [
    "#FED976", "#FEB24C", "#FD8D3C", "#E31A1C", "#BD0026", "#800026",
];

/// Radius used for zero (and otherwise non-positive) magnitudes.
pub const MIN_RADIUS: f64 = 1.0;

/// Radius multiplier of the standard style profile.
pub const DEFAULT_RADIUS_MULTIPLIER: f64 = 4.0;

/// Marker outline.
pub const DEFAULT_STROKE_WEIGHT: f64 = 0.5;
pub const DEFAULT_STROKE_COLOR: &str = "#FF0000";

/// Marker fill opacity.
pub const DEFAULT_FILL_OPACITY: f64 = 0.6;

/// Overlay and legend titles.
pub const OVERLAY_NAME: &str = "Earthquakes";
pub const LEGEND_TITLE: &str = "Earthquake Depth";

/// Popup fallback when the feed omits `place`.
pub const UNKNOWN_PLACE: &str = "Unknown location";

/// User-Agent sent with feed requests.
pub const USER_AGENT: &str = concat!("quakemap/", env!("CARGO_PKG_VERSION"));
