use crate::{
    constants::TILE_SIZE,
    core::{
        geo::{Point, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::surface::{MapSurface, TilePlacement},
    Result,
};

/// Deepest zoom whose tile indices fit in a `u32`
const MAX_TILE_ZOOM: u8 = 30;

const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const TOPO_ATTRIBUTION: &str = "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, \
     <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; \
     <a href=\"https://opentopomap.org\">OpenTopoMap</a> \
     (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)";

/// Slippy-map base layer described by a `{s}/{z}/{x}/{y}` URL template.
///
/// The layer does not fetch imagery itself; it works out which tiles cover
/// the viewport and hands their URLs and screen positions to the surface.
pub struct TileLayer {
    properties: LayerProperties,
    url_template: String,
    subdomains: Vec<String>,
    attribution: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl TileLayer {
    pub fn new(id: String, name: String, url_template: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            url_template,
            subdomains: vec!["a".into(), "b".into(), "c".into()],
            attribution: String::new(),
            min_zoom: 0,
            max_zoom: 18,
        }
    }

    /// The "Street Map" base layer
    pub fn openstreetmap() -> Self {
        Self::new(
            "street".into(),
            "Street Map".into(),
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
        )
        .with_attribution(OSM_ATTRIBUTION)
        .with_zoom_range(0, 19)
    }

    /// The "Topographic Map" base layer
    pub fn opentopomap() -> Self {
        Self::new(
            "topo".into(),
            "Topographic Map".into(),
            "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png".into(),
        )
        .with_attribution(TOPO_ATTRIBUTION)
        .with_zoom_range(0, 17)
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = attribution.into();
        self
    }

    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        let max_zoom = max_zoom.min(MAX_TILE_ZOOM);
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom;
        self
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Expands the URL template for `coord`. Subdomains rotate on `x + y`
    /// so neighbouring tiles spread over hosts.
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x as usize) + (coord.y as usize)) % self.subdomains.len();
            self.subdomains[idx].as_str()
        };

        let url = self
            .url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if subdomain.is_empty() {
            url.replace("://.", "://")
        } else {
            url
        }
    }

    /// Tiles covering the viewport at its integer zoom, capped at the layer's
    /// `max_zoom`, with the screen position of each tile's top-left corner.
    /// Below `min_zoom` the layer shows nothing.
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TilePlacement> {
        let level = viewport.zoom.floor().max(0.0);
        if level < self.min_zoom as f64 {
            return Vec::new();
        }
        let zoom = level.min(self.max_zoom as f64) as u8;
        let tiles_per_axis = 1i64 << zoom;
        let tile_size = TILE_SIZE as f64;

        // Tile grid at `zoom` may differ from the view's fractional zoom
        let scale = 2_f64.powf(viewport.zoom - zoom as f64);
        let center = viewport.project(&viewport.center, Some(zoom as f64));
        let half = Point::new(
            viewport.size.x / 2.0 / scale,
            viewport.size.y / 2.0 / scale,
        );

        let min_x = ((center.x - half.x) / tile_size).floor() as i64;
        let max_x = ((center.x + half.x) / tile_size).ceil() as i64 - 1;
        let min_y = (((center.y - half.y) / tile_size).floor() as i64).max(0);
        let max_y = (((center.y + half.y) / tile_size).ceil() as i64 - 1).min(tiles_per_axis - 1);

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Wrap horizontally around the antimeridian
                let wrapped_x = x.rem_euclid(tiles_per_axis);
                let coord = TileCoord::new(wrapped_x as u32, y as u32, zoom);

                let origin = Point::new(
                    (x as f64 * tile_size - center.x) * scale + viewport.size.x / 2.0,
                    (y as f64 * tile_size - center.y) * scale + viewport.size.y / 2.0,
                );

                tiles.push(TilePlacement {
                    url: self.tile_url(coord),
                    coord,
                    origin,
                    size: tile_size * scale,
                });
            }
        }

        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&self, surface: &mut dyn MapSurface, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }
        let tiles = self.visible_tiles(viewport);
        log::trace!("{}: {} tiles in view", self.name(), tiles.len());
        surface.draw_tiles(self.name(), &tiles, &self.attribution, self.opacity())
    }
}
