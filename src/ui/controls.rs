use crate::{core::geo::Point, traits::Control};
use serde::{Deserialize, Serialize};

/// Corner of the map container a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    /// Top-left corner for a control of `size` inside `container`
    pub fn anchor(&self, container: Point, size: Point, margin: f64) -> Point {
        match self {
            Position::TopLeft => Point::new(margin, margin),
            Position::TopRight => Point::new(container.x - margin - size.x, margin),
            Position::BottomLeft => Point::new(margin, container.y - margin - size.y),
            Position::BottomRight => Point::new(
                container.x - margin - size.x,
                container.y - margin - size.y,
            ),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::TopRight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Mutually exclusive (radio button)
    Base,
    /// Independently toggled (checkbox)
    Overlay,
}

/// One row of the layer switcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControlEntry {
    pub name: String,
    pub kind: LayerKind,
    pub active: bool,
}

/// Layer switcher listing base layers and overlays by name
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControl {
    pub position: Position,
    pub collapsed: bool,
    base_layers: Vec<String>,
    overlays: Vec<String>,
}

impl LayerControl {
    pub fn new(collapsed: bool) -> Self {
        Self {
            position: Position::TopRight,
            collapsed,
            base_layers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn add_base_layer(&mut self, name: impl Into<String>) {
        self.base_layers.push(name.into());
    }

    pub fn add_overlay(&mut self, name: impl Into<String>) {
        self.overlays.push(name.into());
    }

    pub fn base_layers(&self) -> &[String] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[String] {
        &self.overlays
    }

    /// Rows in display order: base layers first, then overlays
    pub fn entries<F>(&self, active_base: &str, overlay_visible: F) -> Vec<LayerControlEntry>
    where
        F: Fn(&str) -> bool,
    {
        let bases = self.base_layers.iter().map(|name| LayerControlEntry {
            name: name.clone(),
            kind: LayerKind::Base,
            active: name == active_base,
        });
        let overlays = self.overlays.iter().map(|name| LayerControlEntry {
            name: name.clone(),
            kind: LayerKind::Overlay,
            active: overlay_visible(name),
        });
        bases.chain(overlays).collect()
    }
}

impl Control for LayerControl {
    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_order_and_state() {
        let mut control = LayerControl::new(false);
        control.add_base_layer("Street Map");
        control.add_base_layer("Topographic Map");
        control.add_overlay("Earthquakes");

        let entries = control.entries("Topographic Map", |_| true);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Street Map", "Topographic Map", "Earthquakes"]);
        assert!(!entries[0].active);
        assert!(entries[1].active);
        assert_eq!(entries[2].kind, LayerKind::Overlay);
        assert!(entries[2].active);
        assert_eq!(control.position(), Position::TopRight);
    }

    #[test]
    fn test_anchor_corners() {
        let container = Point::new(800.0, 600.0);
        let size = Point::new(100.0, 50.0);
        assert_eq!(
            Position::BottomRight.anchor(container, size, 10.0),
            Point::new(690.0, 540.0)
        );
        assert_eq!(
            Position::TopLeft.anchor(container, size, 10.0),
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn test_position_serde() {
        assert_eq!(
            serde_json::to_string(&Position::BottomRight).unwrap(),
            "\"bottom_right\""
        );
        let pos: Position = serde_json::from_str("\"top_left\"").unwrap();
        assert_eq!(pos, Position::TopLeft);
    }
}
