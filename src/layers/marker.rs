use crate::{
    core::{
        config::MarkerStyleOptions,
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    data::earthquake::EarthquakeFeature,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::surface::MapSurface,
    style::{
        classifier::DepthScale,
        marker::{style_feature, MarkerStyle},
    },
    ui::popup::Popup,
    Result,
};

/// A circle marker for one earthquake, with its popup bound to it.
pub struct CircleMarker {
    properties: LayerProperties,
    position: LatLng,
    style: MarkerStyle,
    popup: Popup,
    feature: EarthquakeFeature,
}

impl CircleMarker {
    pub fn new(id: String, feature: EarthquakeFeature, style: MarkerStyle) -> Self {
        let properties = LayerProperties::new(id, feature.place.clone(), LayerType::Marker);
        Self {
            properties,
            position: feature.lat_lng(),
            popup: Popup::for_earthquake(&feature),
            style,
            feature,
        }
    }

    /// Styles `feature` with the shared depth scale and marker options
    pub fn for_earthquake(
        id: String,
        feature: EarthquakeFeature,
        scale: &DepthScale,
        options: &MarkerStyleOptions,
    ) -> Self {
        let style = style_feature(&feature, scale, options);
        Self::new(id, feature, style)
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn feature(&self) -> &EarthquakeFeature {
        &self.feature
    }

    /// Whether the screen point lies on the drawn circle (stroke included)
    pub fn hit_test(&self, viewport: &Viewport, point: &Point) -> bool {
        let center = viewport.lat_lng_to_pixel(&self.position);
        center.distance_to(point) <= self.style.radius + self.style.stroke_weight / 2.0
    }

    fn on_screen(&self, center: &Point, viewport: &Viewport) -> bool {
        let r = self.style.radius + self.style.stroke_weight;
        center.x + r >= 0.0
            && center.y + r >= 0.0
            && center.x - r <= viewport.size.x
            && center.y - r <= viewport.size.y
    }
}

impl LayerTrait for CircleMarker {
    crate::impl_layer_trait!(CircleMarker, properties);

    fn render(&self, surface: &mut dyn MapSurface, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }
        let center = viewport.lat_lng_to_pixel(&self.position);
        if !self.on_screen(&center, viewport) {
            return Ok(());
        }
        surface.draw_circle_marker(self.id(), center, &self.style, self.opacity())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::{DrawCommand, SceneRecorder};

    fn quake(lat: f64, lng: f64, magnitude: f64) -> EarthquakeFeature {
        EarthquakeFeature {
            id: Some("ci123".into()),
            longitude: lng,
            latitude: lat,
            depth: 8.0,
            magnitude,
            place: "3 km E of Ridgecrest, CA".into(),
            timestamp_millis: 0,
        }
    }

    fn marker(lat: f64, lng: f64, magnitude: f64) -> CircleMarker {
        CircleMarker::for_earthquake(
            "ci123".into(),
            quake(lat, lng, magnitude),
            &DepthScale::default(),
            &MarkerStyleOptions::default(),
        )
    }

    #[test]
    fn test_marker_carries_style_and_popup() {
        let marker = marker(35.6, -117.6, 3.0);
        assert_eq!(marker.style().radius, 12.0);
        assert_eq!(marker.style().fill_color.to_string(), "#E31A1C");
        assert_eq!(marker.popup().title, "Magnitude: 3, Depth: 8");
        assert_eq!(marker.name(), "3 km E of Ridgecrest, CA");
        assert_eq!(marker.layer_type(), LayerType::Marker);
    }

    #[test]
    fn test_hit_test_uses_radius() {
        let viewport = Viewport::new(LatLng::new(35.6, -117.6), 8.0, Point::new(400.0, 400.0));
        let marker = marker(35.6, -117.6, 3.0);

        assert!(marker.hit_test(&viewport, &Point::new(200.0, 200.0)));
        assert!(marker.hit_test(&viewport, &Point::new(211.0, 200.0)));
        assert!(!marker.hit_test(&viewport, &Point::new(215.0, 200.0)));
    }

    #[test]
    fn test_offscreen_marker_is_culled() {
        let viewport = Viewport::new(LatLng::new(35.6, -117.6), 8.0, Point::new(400.0, 400.0));
        let mut recorder = SceneRecorder::default();

        marker(35.6, -117.6, 3.0).render(&mut recorder, &viewport).unwrap();
        marker(-33.9, 151.2, 3.0).render(&mut recorder, &viewport).unwrap();

        assert_eq!(recorder.commands().len(), 1);
        assert!(matches!(recorder.commands()[0], DrawCommand::CircleMarker { .. }));
    }

    #[test]
    fn test_hidden_marker_draws_nothing() {
        let viewport = Viewport::new(LatLng::new(35.6, -117.6), 8.0, Point::new(400.0, 400.0));
        let mut marker = marker(35.6, -117.6, 3.0);
        marker.set_visible(false);

        let mut recorder = SceneRecorder::default();
        marker.render(&mut recorder, &viewport).unwrap();
        assert!(recorder.commands().is_empty());
    }
}
