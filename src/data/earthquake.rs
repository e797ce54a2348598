use crate::{
    constants::UNKNOWN_PLACE,
    core::geo::LatLng,
    data::geojson::{GeoJsonFeature, GeoJsonGeometry},
    MapError, Result,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One decoded feed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    /// Hypocenter depth in km
    pub depth: f64,
    pub magnitude: f64,
    pub place: String,
    /// Origin time, milliseconds since the Unix epoch
    pub timestamp_millis: i64,
}

impl EarthquakeFeature {
    /// Decodes the `index`-th feature of a feed.
    ///
    /// Fails with [`MapError::MalformedFeature`] when a field needed for
    /// styling or placement is missing or not a finite number. A missing
    /// `place` falls back to a placeholder instead.
    pub fn from_geojson(index: usize, feature: &GeoJsonFeature) -> Result<Self> {
        let malformed = |reason: String| MapError::MalformedFeature { index, reason };

        let coordinates = match &feature.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => coordinates,
            Some(other) => {
                return Err(malformed(format!(
                    "expected Point geometry, got {}",
                    other.type_name()
                )))
            }
            None => return Err(malformed("missing geometry".into())),
        };

        let (longitude, latitude, depth) = match coordinates.as_slice() {
            [lng, lat, depth, ..] => (*lng, *lat, *depth),
            [_, _] => return Err(malformed("missing depth coordinate".into())),
            _ => return Err(malformed("expected [lon, lat, depth] coordinates".into())),
        };

        let position = LatLng::from_lng_lat(longitude, latitude);
        if !(longitude.is_finite() && latitude.is_finite()) || !position.is_valid() {
            return Err(malformed(format!(
                "invalid position [{longitude}, {latitude}]"
            )));
        }
        if !depth.is_finite() {
            return Err(malformed("depth is not a number".into()));
        }

        let magnitude = feature
            .property("mag")
            .and_then(|v| v.as_f64())
            .filter(|m| m.is_finite())
            .ok_or_else(|| malformed("missing or non-numeric magnitude".into()))?;

        let timestamp_millis = feature
            .property("time")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|t| t as i64)))
            .ok_or_else(|| malformed("missing or non-numeric time".into()))?;

        let place = feature
            .property("place")
            .and_then(|v| v.as_str())
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();

        Ok(Self {
            id: feature.id_string(),
            longitude,
            latitude,
            depth,
            magnitude,
            place,
            timestamp_millis,
        })
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::from_lng_lat(self.longitude, self.latitude)
    }

    /// Origin time, if the timestamp is representable
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis).single()
    }

    /// Origin time formatted for display, e.g. `Tue Nov 14 2023 19:06:40 UTC`
    pub fn formatted_time(&self) -> String {
        match self.time() {
            Some(time) => time.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
            None => format!("@{} ms", self.timestamp_millis),
        }
    }
}
