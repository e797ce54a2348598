use crate::{
    constants::LEGEND_TITLE,
    style::{
        classifier::DepthScale,
        legend::{floor_entry, legend_entries, LegendEntry},
    },
    traits::Control,
    ui::controls::Position,
};

/// Depth legend anchored to a corner of the map
#[derive(Debug, Clone, PartialEq)]
pub struct LegendControl {
    pub position: Position,
    pub title: String,
    /// Prepend a `≤<first threshold>` row for the shallowest bin
    pub floor_entry: bool,
}

impl LegendControl {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            title: LEGEND_TITLE.to_string(),
            floor_entry: false,
        }
    }

    pub fn with_floor_entry(mut self, enabled: bool) -> Self {
        self.floor_entry = enabled;
        self
    }

    pub fn entries(&self, scale: &DepthScale) -> Vec<LegendEntry> {
        let mut entries = Vec::new();
        if self.floor_entry {
            entries.extend(floor_entry(scale));
        }
        entries.extend(legend_entries(scale));
        entries
    }
}

impl Default for LegendControl {
    fn default() -> Self {
        Self::new(Position::BottomRight)
    }
}

impl Control for LegendControl {
    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_legend() {
        let legend = LegendControl::default();
        assert_eq!(legend.position(), Position::BottomRight);
        assert_eq!(legend.title, "Earthquake Depth");

        let labels: Vec<_> = legend
            .entries(&DepthScale::default())
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, ["1\u{2013}3", "3\u{2013}5", "5\u{2013}10", "10\u{2013}20", "20+"]);
    }

    #[test]
    fn test_floor_entry_comes_first() {
        let scale = DepthScale::default();
        let entries = LegendControl::default().with_floor_entry(true).entries(&scale);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].label, "\u{2264}1");
        assert_eq!(entries[0].color, scale.bins()[0].color);
    }
}
