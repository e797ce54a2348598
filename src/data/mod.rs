pub mod earthquake;
pub mod feed;
pub mod geojson;
#[cfg(feature = "tokio-runtime")]
pub mod refresh;

pub use earthquake::EarthquakeFeature;
pub use feed::{FeedMagnitude, FeedPeriod, FeedSource, HttpFeed, StaticFeed};
pub use geojson::{FeedMetadata, GeoJson, GeoJsonFeature, GeoJsonGeometry};
#[cfg(feature = "tokio-runtime")]
pub use refresh::FeedRefresher;
