use crate::{
    constants::OVERLAY_NAME,
    core::{
        config::{MarkerStyleOptions, QuakeMapConfig},
        geo::Point,
        viewport::Viewport,
    },
    data::{earthquake::EarthquakeFeature, feed::FeedSource, geojson::GeoJson},
    layers::{base::LayerTrait, group::LayerGroup, marker::CircleMarker, tile::TileLayer},
    rendering::surface::MapSurface,
    spatial::index::{SpatialIndex, SpatialItem},
    style::{classifier::DepthScale, legend::LegendEntry},
    traits::Control,
    ui::{controls::LayerControl, legend::LegendControl, popup::PopupManager},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

/// Where the earthquake data stands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedStatus {
    /// Nothing fetched yet
    Pending,
    Loaded { markers: usize, skipped: usize },
    /// The last fetch failed; the message is shown to the user
    Unavailable(String),
}

impl FeedStatus {
    /// Status line for the map, if there is anything to say
    pub fn message(&self) -> Option<String> {
        match self {
            FeedStatus::Pending => Some("Loading earthquake data\u{2026}".to_string()),
            FeedStatus::Loaded { .. } => None,
            FeedStatus::Unavailable(reason) => {
                Some(format!("Earthquake data unavailable: {}", reason))
            }
        }
    }
}

/// A feed record that did not become a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFeature {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of one render pass over a feed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    pub rendered: usize,
    pub skipped: Vec<SkippedFeature>,
}

/// The earthquake map: base layers, the earthquake overlay, controls and
/// feed state.
pub struct MapView {
    config: QuakeMapConfig,
    marker_options: MarkerStyleOptions,
    base_layers: Vec<TileLayer>,
    active_base: usize,
    overlay: LayerGroup,
    layer_control: LayerControl,
    legend: LegendControl,
    popups: PopupManager,
    /// Marker positions projected at zoom 0, valued by overlay index
    index: SpatialIndex<usize>,
    /// Largest marker hit radius in pixels, bounds the index query
    max_hit_radius: f64,
    status: FeedStatus,
}

impl MapView {
    /// Map with the default Street Map / Topographic Map base layers
    pub fn new(config: QuakeMapConfig) -> Result<Self> {
        Self::with_base_layers(
            config,
            vec![TileLayer::openstreetmap(), TileLayer::opentopomap()],
        )
    }

    pub fn with_base_layers(config: QuakeMapConfig, base_layers: Vec<TileLayer>) -> Result<Self> {
        config.validate()?;
        if base_layers.is_empty() {
            return Err(MapError::Layer("at least one base layer is required".into()));
        }

        let mut layer_control = LayerControl::new(config.layer_control_collapsed);
        for layer in &base_layers {
            layer_control.add_base_layer(layer.name());
        }
        layer_control.add_overlay(OVERLAY_NAME);

        let legend = LegendControl::new(config.legend_position)
            .with_floor_entry(config.legend_floor_entry);

        let mut map = Self {
            marker_options: config.marker_style(),
            config,
            base_layers,
            active_base: 0,
            overlay: LayerGroup::new("earthquakes".into(), OVERLAY_NAME.into()),
            layer_control,
            legend,
            popups: PopupManager::new(),
            index: SpatialIndex::new(),
            max_hit_radius: 0.0,
            status: FeedStatus::Pending,
        };
        map.show_active_base();
        Ok(map)
    }

    /// Replaces the overlay with one marker per decodable feature.
    ///
    /// Features that fail to decode are logged and listed in the report;
    /// they never abort the pass. Calling this twice with the same document
    /// yields the same markers.
    pub fn render_collection(&mut self, geojson: &GeoJson) -> RenderReport {
        self.clear_markers();

        let scale = &self.config.depth_scale;
        let mut report = RenderReport::default();

        for (i, feature) in geojson.features().into_iter().enumerate() {
            match EarthquakeFeature::from_geojson(i, feature) {
                Ok(quake) => {
                    let id = quake.id.clone().unwrap_or_else(|| format!("quake-{}", i));
                    let marker =
                        CircleMarker::for_earthquake(id, quake, scale, &self.marker_options);
                    self.overlay.add(marker);
                }
                Err(err) => {
                    log::warn!("skipping feature: {}", err);
                    let reason = match err {
                        MapError::MalformedFeature { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    report.skipped.push(SkippedFeature {
                        index: i,
                        id: feature.id_string(),
                        reason,
                    });
                }
            }
        }

        self.rebuild_index();
        report.rendered = self.overlay.len();
        self.status = FeedStatus::Loaded {
            markers: report.rendered,
            skipped: report.skipped.len(),
        };

        log::debug!(
            "rendered {} earthquake markers ({} skipped)",
            report.rendered,
            report.skipped.len()
        );
        report
    }

    /// Applies the outcome of a fetch. On failure the status becomes
    /// [`FeedStatus::Unavailable`]; with `keep_previous` the markers from the
    /// last good document stay on the map, otherwise none are shown.
    pub fn apply_feed_result(
        &mut self,
        result: Result<GeoJson>,
        keep_previous: bool,
    ) -> Result<RenderReport> {
        match result {
            Ok(geojson) => Ok(self.render_collection(&geojson)),
            Err(err) => {
                log::error!("earthquake feed failed: {}", err);
                self.status = FeedStatus::Unavailable(err.to_string());
                if !keep_previous {
                    self.clear_markers();
                }
                Err(err)
            }
        }
    }

    /// Fetches `source` once and renders it
    pub async fn load(&mut self, source: &dyn FeedSource) -> Result<RenderReport> {
        log::debug!("loading earthquakes from {}", source.describe());
        let result = source.fetch().await;
        self.apply_feed_result(result, false)
    }

    /// Like [`MapView::load`], but a failure keeps the current markers
    pub async fn refresh(&mut self, source: &dyn FeedSource) -> Result<RenderReport> {
        let result = source.fetch().await;
        self.apply_feed_result(result, true)
    }

    pub fn select_base_layer(&mut self, name: &str) -> Result<()> {
        let index = self
            .base_layers
            .iter()
            .position(|layer| layer.name() == name)
            .ok_or_else(|| MapError::Layer(format!("unknown base layer '{}'", name)))?;
        self.active_base = index;
        self.show_active_base();
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.overlay.set_visible(visible);
        if !visible {
            self.popups.close_all();
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Topmost marker drawn under `point` (container pixels)
    pub fn marker_at(&self, viewport: &Viewport, point: &Point) -> Option<&CircleMarker> {
        if !self.overlay.is_visible() || self.index.is_empty() {
            return None;
        }

        let lat_lng = viewport.pixel_to_lat_lng(point);
        let world = viewport.project(&lat_lng, Some(0.0));
        let radius = self.max_hit_radius / viewport.scale();

        self.index
            .query_radius(&world, radius)
            .into_iter()
            .map(|item| item.data)
            .filter(|&i| {
                self.overlay
                    .get(i)
                    .map_or(false, |marker| marker.hit_test(viewport, point))
            })
            .max()
            .and_then(|i| self.overlay.get(i))
    }

    /// Opens the popup of the marker under `point`, or closes popups when
    /// the click hits empty map. Returns the id of the opened marker.
    pub fn click(&mut self, viewport: &Viewport, point: &Point) -> Option<String> {
        let hit = self
            .marker_at(viewport, point)
            .map(|m| (m.id().to_string(), m.position(), m.popup().clone()));

        match hit {
            Some((id, anchor, popup)) => {
                self.popups.open(id.clone(), anchor, popup);
                Some(id)
            }
            None => {
                self.popups.close_all();
                None
            }
        }
    }

    pub fn close_popup(&mut self, id: &str) -> bool {
        self.popups.close(id)
    }

    /// Draws the active base layer, the markers, open popups, the layer
    /// control, the legend and the feed status, in that order.
    pub fn render(&self, surface: &mut dyn MapSurface, viewport: &Viewport) -> Result<()> {
        self.active_base_layer().render(surface, viewport)?;
        self.overlay.render(surface, viewport)?;

        if self.overlay.is_visible() {
            for (_, open) in self.popups.open_popups() {
                surface.draw_popup(viewport.lat_lng_to_pixel(&open.anchor), &open.popup)?;
            }
        }

        let entries = self.layer_control.entries(self.active_base_layer().name(), |name| {
            name == self.overlay.name() && self.overlay.is_visible()
        });
        surface.draw_layer_control(&self.layer_control, &entries)?;

        surface.draw_legend(
            self.legend.position(),
            &self.legend.title,
            &self.legend_entries(),
        )?;

        if let Some(message) = self.status.message() {
            surface.draw_status(&message)?;
        }
        Ok(())
    }

    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.legend.entries(&self.config.depth_scale)
    }

    /// Viewport at the configured center and zoom
    pub fn initial_viewport(&self, size: Point) -> Viewport {
        Viewport::new(self.config.center, self.config.zoom, size)
    }

    /// Fits `viewport` to the loaded markers; false when there are none
    pub fn fit_to_markers(&self, viewport: &mut Viewport) -> bool {
        match self.overlay.bounds() {
            Some(bounds) => {
                viewport.fit_bounds(&bounds);
                true
            }
            None => false,
        }
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn config(&self) -> &QuakeMapConfig {
        &self.config
    }

    pub fn depth_scale(&self) -> &DepthScale {
        &self.config.depth_scale
    }

    pub fn marker_options(&self) -> &MarkerStyleOptions {
        &self.marker_options
    }

    pub fn markers(&self) -> &[CircleMarker] {
        self.overlay.markers()
    }

    pub fn overlay(&self) -> &LayerGroup {
        &self.overlay
    }

    pub fn base_layers(&self) -> &[TileLayer] {
        &self.base_layers
    }

    pub fn active_base_layer(&self) -> &TileLayer {
        &self.base_layers[self.active_base]
    }

    pub fn layer_control(&self) -> &LayerControl {
        &self.layer_control
    }

    pub fn legend(&self) -> &LegendControl {
        &self.legend
    }

    pub fn popups(&self) -> &PopupManager {
        &self.popups
    }

    fn show_active_base(&mut self) {
        for (i, layer) in self.base_layers.iter_mut().enumerate() {
            layer.set_visible(i == self.active_base);
        }
    }

    fn clear_markers(&mut self) {
        self.overlay.clear();
        self.popups.close_all();
        self.index.clear();
        self.max_hit_radius = 0.0;
    }

    fn rebuild_index(&mut self) {
        let viewport = Viewport::default();
        let items = self
            .overlay
            .markers()
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let world = viewport.project(&marker.position(), Some(0.0));
                SpatialItem::new(marker.id().to_string(), world, i)
            })
            .collect();
        self.index = SpatialIndex::bulk_load(items);

        self.max_hit_radius = self
            .overlay
            .markers()
            .iter()
            .map(|m| m.style().radius + m.style().stroke_weight / 2.0)
            .fold(0.0, f64::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        rendering::surface::{DrawCommand, SceneRecorder},
    };
    use serde_json::json;

    fn collection() -> GeoJson {
        serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature", "id": "a",
                    "properties": {"mag": 2.0, "place": "A", "time": 0},
                    "geometry": {"type": "Point", "coordinates": [-95.71, 37.09, 4.0]}
                },
                {
                    "type": "Feature", "id": "b",
                    "properties": {"mag": 1.0, "place": "B", "time": 0},
                    "geometry": {"type": "Point", "coordinates": [-95.0, 37.5]}
                },
                {
                    "type": "Feature", "id": "c",
                    "properties": {"mag": 5.0, "place": "C", "time": 0},
                    "geometry": {"type": "Point", "coordinates": [-90.0, 35.0, 30.0]}
                }
            ]
        }))
        .unwrap()
    }

    fn map() -> MapView {
        MapView::new(QuakeMapConfig::default()).unwrap()
    }

    #[test]
    fn test_render_collection_skips_malformed() {
        let mut map = map();
        let report = map.render_collection(&collection());

        assert_eq!(report.rendered, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].id.as_deref(), Some("b"));
        assert_eq!(
            map.status(),
            &FeedStatus::Loaded {
                markers: 2,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_failed_fetch_shows_no_markers() {
        let mut map = map();
        map.render_collection(&collection());

        let err = map
            .apply_feed_result(Err(MapError::FeedUnavailable("timeout".into())), false)
            .unwrap_err();
        assert!(matches!(err, MapError::FeedUnavailable(_)));
        assert!(map.markers().is_empty());
        assert!(matches!(map.status(), FeedStatus::Unavailable(_)));
    }

    #[test]
    fn test_failed_refresh_keeps_markers() {
        let mut map = map();
        map.render_collection(&collection());

        let _ = map.apply_feed_result(Err(MapError::FeedUnavailable("timeout".into())), true);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(
            map.status().message().unwrap(),
            "Earthquake data unavailable: Earthquake feed unavailable: timeout"
        );
    }

    #[test]
    fn test_base_layer_switching() {
        let mut map = map();
        assert!(map.base_layers()[0].is_visible());
        assert!(!map.base_layers()[1].is_visible());

        map.select_base_layer("Topographic Map").unwrap();
        assert_eq!(map.active_base_layer().name(), "Topographic Map");
        assert!(!map.base_layers()[0].is_visible());

        assert!(matches!(
            map.select_base_layer("Satellite"),
            Err(MapError::Layer(_))
        ));
        assert_eq!(map.active_base_layer().name(), "Topographic Map");
    }

    #[test]
    fn test_click_opens_and_closes_popup() {
        let mut map = map();
        map.render_collection(&collection());
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 5.0, Point::new(800.0, 600.0));

        assert_eq!(
            map.click(&viewport, &Point::new(403.0, 300.0)).as_deref(),
            Some("a")
        );
        assert!(map.popups().is_open("a"));

        assert!(map.click(&viewport, &Point::new(10.0, 10.0)).is_none());
        assert!(map.popups().is_empty());
    }

    #[test]
    fn test_render_order() {
        let mut map = map();
        map.render_collection(&collection());
        let viewport = map.initial_viewport(Point::new(1200.0, 800.0));

        let mut recorder = SceneRecorder::new();
        map.render(&mut recorder, &viewport).unwrap();

        let kinds: Vec<_> = recorder
            .commands()
            .iter()
            .map(|cmd| match cmd {
                DrawCommand::Tiles { .. } => "tiles",
                DrawCommand::CircleMarker { .. } => "marker",
                DrawCommand::LayerControl { .. } => "control",
                DrawCommand::Legend { .. } => "legend",
                DrawCommand::Popup { .. } => "popup",
                DrawCommand::Status { .. } => "status",
            })
            .collect();
        assert_eq!(kinds, ["tiles", "marker", "marker", "control", "legend"]);
    }
}
