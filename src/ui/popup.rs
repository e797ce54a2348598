use crate::{core::geo::LatLng, data::earthquake::EarthquakeFeature, prelude::HashMap};
use serde::{Deserialize, Serialize};

/// Popup content bound to a marker: a heading, then body lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

impl Popup {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// `Magnitude: <mag>, Depth: <depth>` over the place and origin time
    pub fn for_earthquake(feature: &EarthquakeFeature) -> Self {
        Self::new(
            format!(
                "Magnitude: {}, Depth: {}",
                feature.magnitude, feature.depth
            ),
            vec![feature.place.clone(), feature.formatted_time()],
        )
    }

    /// Plain-text rendering, title and body separated by a blank line
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.title, self.lines.join("\n"))
    }
}

/// A popup opened on the map at a geographic anchor
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    pub anchor: LatLng,
    pub popup: Popup,
}

/// Tracks open popups by marker id. By default opening a popup closes the
/// others, like clicking from marker to marker on a web map.
#[derive(Debug, Clone)]
pub struct PopupManager {
    popups: HashMap<String, OpenPopup>,
    auto_close: bool,
}

impl PopupManager {
    pub fn new() -> Self {
        Self {
            popups: HashMap::default(),
            auto_close: true,
        }
    }

    /// Keep several popups open at once
    pub fn with_auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = auto_close;
        self
    }

    pub fn open(&mut self, id: impl Into<String>, anchor: LatLng, popup: Popup) {
        if self.auto_close {
            self.popups.clear();
        }
        self.popups.insert(id.into(), OpenPopup { anchor, popup });
    }

    pub fn close(&mut self, id: &str) -> bool {
        self.popups.remove(id).is_some()
    }

    pub fn close_all(&mut self) {
        self.popups.clear();
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.popups.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&OpenPopup> {
        self.popups.get(id)
    }

    pub fn open_popups(&self) -> impl Iterator<Item = (&str, &OpenPopup)> + '_ {
        self.popups.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }
}

impl Default for PopupManager {
    fn default() -> Self {
        Self::new()
    }
}
