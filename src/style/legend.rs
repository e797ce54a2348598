//! Legend binning.
//!
//! Entries are derived from the [`DepthScale`] that styles the markers, so a
//! swatch always shows the color a quake inside its range is drawn with.

use crate::style::{classifier::DepthScale, color::HexColor};
use serde::{Deserialize, Serialize};

/// One legend row: a color swatch and the depth range it stands for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: HexColor,
    pub label: String,
}

impl LegendEntry {
    pub fn new(color: HexColor, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
        }
    }
}

/// `"<low>–<high>"` for each pair of finite thresholds and `"<low>+"` for the
/// last one. The color is the one [`DepthScale::classify`] returns inside the
/// range, i.e. the bin just above `low`.
pub fn legend_entries(scale: &DepthScale) -> Vec<LegendEntry> {
    let bins = scale.bins();
    let mut entries = Vec::with_capacity(bins.len().saturating_sub(1));

    for (i, bin) in bins.iter().enumerate() {
        if bin.is_unbounded() {
            break;
        }
        let Some(next) = bins.get(i + 1) else {
            break;
        };

        let label = if next.is_unbounded() {
            format!("{}+", format_depth(bin.threshold))
        } else {
            format!(
                "{}\u{2013}{}",
                format_depth(bin.threshold),
                format_depth(next.threshold)
            )
        };
        entries.push(LegendEntry::new(next.color, label));
    }

    entries
}

/// Entry for depths at or below the first threshold, if it is finite
pub fn floor_entry(scale: &DepthScale) -> Option<LegendEntry> {
    let first = scale.bins().first()?;
    if first.is_unbounded() {
        return None;
    }
    Some(LegendEntry::new(
        first.color,
        format!("\u{2264}{}", format_depth(first.threshold)),
    ))
}

/// `1.0` → `"1"`, `2.5` → `"2.5"`
pub fn format_depth(depth: f64) -> String {
    if depth.fract() == 0.0 && depth.abs() < 1e15 {
        format!("{}", depth as i64)
    } else {
        format!("{depth}")
    }
}
