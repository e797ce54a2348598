use crate::constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), center.lng);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Pixels per map unit relative to zoom 0
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857) at `zoom`
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);

        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let x = (lat_lng.lng + 180.0) / 360.0 * world;
        let y = (1.0 - (PI / 4.0 + lat_rad / 2.0).tan().ln() / PI) / 2.0 * world;

        Point::new(x, y)
    }

    /// Inverse of [`Viewport::project`]
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);

        let lng = pixel.x / world * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / world);
        let lat = n.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        let point = self.project(lat_lng, None).subtract(&origin);
        Point::new(point.x + self.size.x / 2.0, point.y + self.size.y / 2.0)
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let world = Point::new(
            pixel.x - self.size.x / 2.0 + origin.x,
            pixel.y - self.size.y / 2.0 + origin.y,
        );
        self.unproject(&world, None)
    }

    /// Pans the view by a pixel offset (positive x moves the content right)
    pub fn pan(&mut self, delta: Point) {
        let center_px = self.project(&self.center, None).subtract(&delta);
        let center = self.unproject(&center_px, None);
        self.set_center(center);
    }

    /// Zooms to `zoom`, keeping the geographic point under `focus` fixed
    pub fn zoom_to(&mut self, zoom: f64, focus: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus {
            Some(focus) => {
                let anchor = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&anchor).subtract(&focus);
                self.pan(Point::new(-drift.x, -drift.y));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Centers on `bounds` at the largest zoom that still shows all of it
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        let nw = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let se = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

        let mut zoom = self.max_zoom.floor();
        while zoom > self.min_zoom {
            let nw_px = self.project(&nw, Some(zoom));
            let se_px = self.project(&se, Some(zoom));
            if se_px.x - nw_px.x <= self.size.x && se_px.y - nw_px.y <= self.size.y {
                break;
            }
            zoom -= 1.0;
        }
        self.set_zoom(zoom);

        // Mercator stretches latitudes, so center on the projected midpoint
        let nw_px = self.project(&nw, None);
        let se_px = self.project(&se, None);
        let mid = Point::new((nw_px.x + se_px.x) / 2.0, (nw_px.y + se_px.y) / 2.0);
        let center = self.unproject(&mid, None);
        self.set_center(center);
    }

    /// Geographic bounds of the visible area
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);
        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let (lat, lng) = crate::constants::DEFAULT_CENTER;
        Self::new(
            LatLng::new(lat, lng),
            crate::constants::DEFAULT_ZOOM,
            Point::new(1200.0, 800.0),
        )
    }
}
