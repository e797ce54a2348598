use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A GeoJSON position. Non-numeric members (e.g. `null` depth) decode as NaN
/// and a missing or non-array position decodes as empty, so one bad record
/// cannot fail the whole document.
pub type Coordinates = Vec<f64>;

fn position_from(value: &serde_json::Value) -> Coordinates {
    value
        .as_array()
        .map(|members| {
            members
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect()
        })
        .unwrap_or_default()
}

fn lenient_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Coordinates, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(position_from).unwrap_or_default())
}

fn lenient_positions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Coordinates>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|positions| positions.iter().map(position_from).collect())
        .unwrap_or_default())
}

/// Geometry that is not an object or lacks a usable `type` decodes as
/// [`GeoJsonGeometry::Unsupported`]
fn lenient_geometry<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<GeoJsonGeometry>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => {
            Some(serde_json::from_value(value).unwrap_or(GeoJsonGeometry::Unsupported))
        }
    })
}

/// Non-object properties decode as absent
fn lenient_properties<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<HashMap<String, serde_json::Value>>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Object(map)) => Some(map.into_iter().collect()),
        _ => None,
    })
}

/// GeoJSON geometry types. Earthquake feeds only carry points; anything else
/// is kept as `Unsupported` and skipped per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        #[serde(default, deserialize_with = "lenient_position")]
        coordinates: Coordinates,
    },
    MultiPoint {
        #[serde(default, deserialize_with = "lenient_positions")]
        coordinates: Vec<Coordinates>,
    },
    #[serde(other)]
    Unsupported,
}

impl GeoJsonGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::Unsupported => "unsupported",
        }
    }
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key).filter(|v| !v.is_null())
    }

    /// Feature id as text, whether the feed uses strings or numbers
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Feed-level metadata attached by USGS summary feeds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedMetadata {
    pub generated: Option<i64>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<u16>,
    pub api: Option<String>,
    pub count: Option<usize>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection {
        features: Vec<GeoJsonFeature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<FeedMetadata>,
    },
}

impl GeoJson {
    pub fn from_str(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn collection(features: Vec<GeoJsonFeature>) -> Self {
        GeoJson::FeatureCollection {
            features,
            metadata: None,
        }
    }

    /// All features, in document order
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features, .. } => features.iter().collect(),
        }
    }

    pub fn metadata(&self) -> Option<&FeedMetadata> {
        match self {
            GeoJson::FeatureCollection { metadata, .. } => metadata.as_ref(),
            GeoJson::Feature(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    {
        "type": "FeatureCollection",
        "metadata": {"generated": 1700000000000, "title": "USGS All Earthquakes, Past Week", "status": 200, "count": 2},
        "features": [
            {
                "type": "Feature",
                "id": "ak0238xyz",
                "properties": {"mag": 1.7, "place": "12 km NW of Anchor Point, Alaska", "time": 1699990000000},
                "geometry": {"type": "Point", "coordinates": [-151.9, 59.8, 64.3]}
            },
            {
                "type": "Feature",
                "id": 42,
                "properties": {"mag": null, "place": null, "time": 1699990000001},
                "geometry": {"type": "Point", "coordinates": [-117.5, 35.6, null]}
            }
        ]
    }
    "#;

    #[test]
    fn test_feature_collection_parsing() {
        let geojson = GeoJson::from_str(SAMPLE).unwrap();
        let features = geojson.features();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id_string().as_deref(), Some("ak0238xyz"));
        assert_eq!(features[1].id_string().as_deref(), Some("42"));

        let metadata = geojson.metadata().unwrap();
        assert_eq!(metadata.count, Some(2));
        assert_eq!(metadata.title.as_deref(), Some("USGS All Earthquakes, Past Week"));
    }

    #[test]
    fn test_null_members_do_not_fail_document() {
        let geojson = GeoJson::from_str(SAMPLE).unwrap();
        let second = geojson.features()[1];

        assert!(second.property("mag").is_none());
        assert!(second.property("time").is_some());
        match second.geometry.as_ref().unwrap() {
            GeoJsonGeometry::Point { coordinates } => {
                assert_eq!(coordinates.len(), 3);
                assert!(coordinates[2].is_nan());
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_geometry_is_tolerated() {
        let json = r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}"#;
        let geojson = GeoJson::from_str(json).unwrap();
        assert_eq!(
            geojson.features()[0].geometry,
            Some(GeoJsonGeometry::Unsupported)
        );
    }

    #[test]
    fn test_broken_feature_members_do_not_fail_document() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"mag": 1.0}, "geometry": {"type": "Point", "coordinates": null}},
            {"type": "Feature", "properties": {"mag": 1.0}, "geometry": {"type": "Point"}},
            {"type": "Feature", "properties": "oops", "geometry": {"type": "Point", "coordinates": [1, 2, 3]}},
            {"type": "Feature", "properties": {}, "geometry": "oops"},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]}"#;
        let geojson = GeoJson::from_str(json).unwrap();
        let features = geojson.features();
        assert_eq!(features.len(), 5);

        let empty_point = Some(GeoJsonGeometry::Point {
            coordinates: Vec::new(),
        });
        assert_eq!(features[0].geometry, empty_point);
        assert_eq!(features[1].geometry, empty_point);
        assert!(features[2].properties.is_none());
        assert_eq!(features[3].geometry, Some(GeoJsonGeometry::Unsupported));
        assert!(features[4].geometry.is_none());
    }

    #[test]
    fn test_rejects_non_geojson() {
        assert!(GeoJson::from_str("<html>502 Bad Gateway</html>").is_err());
        assert!(GeoJson::from_str(r#"{"type": "Topology"}"#).is_err());
    }
}
