use crate::{
    core::config::MarkerStyleOptions,
    data::earthquake::EarthquakeFeature,
    style::{classifier::DepthScale, color::HexColor, scaler::radius},
};
use serde::{Deserialize, Serialize};

/// Resolved paint for one circle marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub fill_color: HexColor,
    /// Radius in screen pixels
    pub radius: f64,
    pub stroke_weight: f64,
    pub stroke_color: HexColor,
    pub fill_opacity: f64,
}

/// Style for one earthquake: color by depth, size by magnitude.
pub fn style_feature(
    feature: &EarthquakeFeature,
    scale: &DepthScale,
    options: &MarkerStyleOptions,
) -> MarkerStyle {
    MarkerStyle {
        fill_color: scale.classify(feature.depth),
        radius: radius(feature.magnitude, options.radius_multiplier),
        stroke_weight: options.stroke_weight,
        stroke_color: options.stroke_color,
        fill_opacity: options.fill_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StyleProfile;

    fn quake(depth: f64, magnitude: f64) -> EarthquakeFeature {
        EarthquakeFeature {
            id: None,
            longitude: -100.0,
            latitude: 40.0,
            depth,
            magnitude,
            place: "test".into(),
            timestamp_millis: 0,
        }
    }

    #[test]
    fn test_zero_magnitude_shallow_quake() {
        let scale = DepthScale::default();
        let style = style_feature(&quake(2.0, 0.0), &scale, &MarkerStyleOptions::default());

        assert_eq!(style.radius, 1.0);
        assert_eq!(style.fill_color, scale.bins()[1].color);
        assert_eq!(style.stroke_weight, 0.5);
        assert_eq!(style.stroke_color.to_string(), "#FF0000");
        assert_eq!(style.fill_opacity, 0.6);
    }

    #[test]
    fn test_profile_changes_only_radius() {
        let scale = DepthScale::default();
        let feature = quake(12.0, 3.0);
        let standard = style_feature(&feature, &scale, &StyleProfile::Standard.resolve());
        let large = style_feature(&feature, &scale, &StyleProfile::Large.resolve());

        assert_eq!(standard.radius, 12.0);
        assert_eq!(large.radius, 15.0);
        assert_eq!(standard.fill_color, large.fill_color);
        assert_eq!(standard.fill_opacity, large.fill_opacity);
    }
}
