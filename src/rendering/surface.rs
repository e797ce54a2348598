//! Drawing backend abstraction.
//!
//! Layers and controls describe what to draw in screen pixels; a
//! [`MapSurface`] decides how. The desktop viewer paints with egui, while
//! [`SceneRecorder`] keeps a serializable display list for headless output
//! and tests.

use crate::{
    core::geo::{Point, TileCoord},
    style::{legend::LegendEntry, marker::MarkerStyle},
    ui::{
        controls::{LayerControl, LayerControlEntry, Position},
        popup::Popup,
    },
    Result,
};
use serde::{Deserialize, Serialize};

/// One base-map tile positioned on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub coord: TileCoord,
    pub url: String,
    /// Top-left corner in container pixels
    pub origin: Point,
    /// Edge length in container pixels
    pub size: f64,
}

pub trait MapSurface {
    fn draw_tiles(
        &mut self,
        layer: &str,
        tiles: &[TilePlacement],
        attribution: &str,
        opacity: f32,
    ) -> Result<()>;

    fn draw_circle_marker(
        &mut self,
        id: &str,
        center: Point,
        style: &MarkerStyle,
        opacity: f32,
    ) -> Result<()>;

    fn draw_layer_control(
        &mut self,
        control: &LayerControl,
        entries: &[LayerControlEntry],
    ) -> Result<()>;

    fn draw_legend(&mut self, position: Position, title: &str, entries: &[LegendEntry])
        -> Result<()>;

    /// `anchor` is the marker center the popup points at
    fn draw_popup(&mut self, anchor: Point, popup: &Popup) -> Result<()>;

    /// Feed status line, e.g. "Earthquake data unavailable"
    fn draw_status(&mut self, message: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Tiles {
        layer: String,
        tiles: Vec<TilePlacement>,
        attribution: String,
        opacity: f32,
    },
    CircleMarker {
        id: String,
        center: Point,
        style: MarkerStyle,
        opacity: f32,
    },
    LayerControl {
        position: Position,
        collapsed: bool,
        entries: Vec<LayerControlEntry>,
    },
    Legend {
        position: Position,
        title: String,
        entries: Vec<LegendEntry>,
    },
    Popup {
        anchor: Point,
        popup: Popup,
    },
    Status {
        message: String,
    },
}

/// Records draw calls as a display list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneRecorder {
    commands: Vec<DrawCommand>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Circle markers in draw order
    pub fn markers(&self) -> impl Iterator<Item = (&str, &Point, &MarkerStyle)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::CircleMarker {
                id, center, style, ..
            } => Some((id.as_str(), center, style)),
            _ => None,
        })
    }

    pub fn legend(&self) -> Option<&[LegendEntry]> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Legend { entries, .. } => Some(entries.as_slice()),
            _ => None,
        })
    }

    pub fn status(&self) -> Option<&str> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Status { message } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl MapSurface for SceneRecorder {
    fn draw_tiles(
        &mut self,
        layer: &str,
        tiles: &[TilePlacement],
        attribution: &str,
        opacity: f32,
    ) -> Result<()> {
        self.commands.push(DrawCommand::Tiles {
            layer: layer.to_string(),
            tiles: tiles.to_vec(),
            attribution: attribution.to_string(),
            opacity,
        });
        Ok(())
    }

    fn draw_circle_marker(
        &mut self,
        id: &str,
        center: Point,
        style: &MarkerStyle,
        opacity: f32,
    ) -> Result<()> {
        self.commands.push(DrawCommand::CircleMarker {
            id: id.to_string(),
            center,
            style: style.clone(),
            opacity,
        });
        Ok(())
    }

    fn draw_layer_control(
        &mut self,
        control: &LayerControl,
        entries: &[LayerControlEntry],
    ) -> Result<()> {
        self.commands.push(DrawCommand::LayerControl {
            position: control.position,
            collapsed: control.collapsed,
            entries: entries.to_vec(),
        });
        Ok(())
    }

    fn draw_legend(
        &mut self,
        position: Position,
        title: &str,
        entries: &[LegendEntry],
    ) -> Result<()> {
        self.commands.push(DrawCommand::Legend {
            position,
            title: title.to_string(),
            entries: entries.to_vec(),
        });
        Ok(())
    }

    fn draw_popup(&mut self, anchor: Point, popup: &Popup) -> Result<()> {
        self.commands.push(DrawCommand::Popup {
            anchor,
            popup: popup.clone(),
        });
        Ok(())
    }

    fn draw_status(&mut self, message: &str) -> Result<()> {
        self.commands.push(DrawCommand::Status {
            message: message.to_string(),
        });
        Ok(())
    }
}
