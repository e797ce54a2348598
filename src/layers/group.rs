use crate::{
    core::{geo::LatLngBounds, viewport::Viewport},
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        marker::CircleMarker,
    },
    rendering::surface::MapSurface,
    Result,
};

/// Named overlay holding the earthquake markers. Toggling the group's
/// visibility hides or shows every marker in it.
pub struct LayerGroup {
    properties: LayerProperties,
    markers: Vec<CircleMarker>,
}

impl LayerGroup {
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Group),
            markers: Vec::new(),
        }
    }

    pub fn add(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }

    /// Removes every marker
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[CircleMarker] {
        &self.markers
    }

    pub fn get(&self, index: usize) -> Option<&CircleMarker> {
        self.markers.get(index)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl LayerTrait for LayerGroup {
    crate::impl_layer_trait!(LayerGroup, properties);

    fn render(&self, surface: &mut dyn MapSurface, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }
        // Feed order, so later quakes paint over earlier ones
        for marker in &self.markers {
            marker.render(surface, viewport)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        let positions: Vec<_> = self.markers.iter().map(|m| m.position()).collect();
        LatLngBounds::from_points(&positions)
    }
}
