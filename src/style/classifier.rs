//! Depth → color classification.
//!
//! A [`DepthScale`] is an ordered table of [`ColorBin`]s. A depth belongs to
//! the first bin whose threshold is at or above it; anything past the last
//! finite threshold (and NaN, which compares false everywhere) falls into the
//! final, unbounded bin. The legend is derived from the same table, see
//! [`crate::style::legend`].

use crate::constants::{DEPTH_BREAKPOINTS, DEPTH_COLORS};
use crate::style::color::HexColor;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// One row of the depth table: depths `<= threshold` (and above the previous
/// threshold) are drawn with `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorBin {
    /// Inclusive edge; `+inf` (serialized as `null`) for the unbounded bin
    #[serde(with = "threshold_serde")]
    pub threshold: f64,
    pub color: HexColor,
}

mod threshold_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let finite = if value.is_infinite() && *value > 0.0 {
            None
        } else {
            Some(*value)
        };
        finite.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

impl ColorBin {
    pub fn new(threshold: f64, color: HexColor) -> Self {
        Self { threshold, color }
    }

    /// The final bin has no upper edge
    pub fn is_unbounded(&self) -> bool {
        self.threshold == f64::INFINITY
    }
}

/// Returns the color of the first bin whose threshold is `>= depth`, or the
/// last bin's color when none matches.
///
/// `bins` must be non-empty; use [`DepthScale`] to get that guarantee.
pub fn classify(depth: f64, bins: &[ColorBin]) -> HexColor {
    bins.iter()
        .find(|bin| bin.threshold >= depth)
        .or_else(|| bins.last())
        .map(|bin| bin.color)
        .unwrap_or(HexColor::rgb(0, 0, 0))
}

/// Validated, ordered bin table shared by marker styling and the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthScale {
    bins: Vec<ColorBin>,
}

impl DepthScale {
    /// Builds a scale from explicit bins.
    ///
    /// Thresholds must be strictly increasing, the table non-empty and the
    /// last bin unbounded.
    pub fn new(bins: Vec<ColorBin>) -> Result<Self> {
        let Some(last) = bins.last() else {
            return Err(MapError::InvalidScale("depth scale has no bins".into()));
        };
        if !last.is_unbounded() {
            return Err(MapError::InvalidScale(format!(
                "last bin {} must be unbounded, got threshold {}",
                last.color, last.threshold
            )));
        }
        if let Some(bin) = bins.iter().find(|bin| bin.threshold.is_nan()) {
            return Err(MapError::InvalidScale(format!(
                "bin {} has a NaN threshold",
                bin.color
            )));
        }
        if let Some(pair) = bins.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            return Err(MapError::InvalidScale(format!(
                "thresholds must be strictly increasing ({} is followed by {})",
                pair[0].threshold, pair[1].threshold
            )));
        }
        Ok(Self { bins })
    }

    /// Builds a scale from `n` breakpoints and `n + 1` colors; the last color
    /// becomes the unbounded bin.
    pub fn from_breakpoints<S: AsRef<str>>(breakpoints: &[f64], colors: &[S]) -> Result<Self> {
        if colors.len() != breakpoints.len() + 1 {
            return Err(MapError::InvalidScale(format!(
                "{} breakpoints need {} colors, got {}",
                breakpoints.len(),
                breakpoints.len() + 1,
                colors.len()
            )));
        }

        let thresholds = breakpoints.iter().copied().chain(std::iter::once(f64::INFINITY));
        let bins = thresholds
            .zip(colors)
            .map(|(threshold, color)| Ok(ColorBin::new(threshold, HexColor::parse(color.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(bins)
    }

    pub fn bins(&self) -> &[ColorBin] {
        &self.bins
    }

    /// Finite thresholds, in order
    pub fn breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.bins
            .iter()
            .map(|bin| bin.threshold)
            .filter(|t| t.is_finite())
    }

    pub fn classify(&self, depth: f64) -> HexColor {
        classify(depth, &self.bins)
    }
}

impl Default for DepthScale {
    fn default() -> Self {
        let bins = DEPTH_BREAKPOINTS
            .iter()
            .copied()
            .chain(std::iter::once(f64::INFINITY))
            .zip(DEPTH_COLORS)
            .filter_map(|(threshold, color)| {
                HexColor::parse(color).ok().map(|c| ColorBin::new(threshold, c))
            })
            .collect();
        Self { bins }
    }
}

impl<'de> Deserialize<'de> for DepthScale {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            bins: Vec<ColorBin>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.bins).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn test_standard_breakpoints() {
        let scale = DepthScale::default();
        assert_eq!(scale.bins().len(), 6);
        assert_eq!(scale.classify(0.5), color("#FED976"));
        assert_eq!(scale.classify(2.0), color("#FEB24C"));
        assert_eq!(scale.classify(25.0), color("#800026"));
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let scale = DepthScale::default();
        assert_eq!(scale.classify(1.0), color("#FED976"));
        assert_eq!(scale.classify(1.0001), color("#FEB24C"));
        assert_eq!(scale.classify(20.0), color("#BD0026"));
        assert_eq!(scale.classify(20.0001), color("#800026"));
    }

    #[test]
    fn test_negative_and_nan_depths() {
        let scale = DepthScale::default();
        assert_eq!(scale.classify(-3.5), color("#FED976"));
        assert_eq!(scale.classify(f64::NAN), color("#800026"));
        assert_eq!(scale.classify(f64::INFINITY), color("#800026"));
        assert_eq!(scale.classify(f64::NEG_INFINITY), color("#FED976"));
    }

    #[test]
    fn test_every_depth_maps_into_the_table() {
        let scale = DepthScale::default();
        let palette: Vec<HexColor> = scale.bins().iter().map(|b| b.color).collect();
        let mut depth = -10.0;
        while depth < 700.0 {
            assert!(palette.contains(&scale.classify(depth)));
            depth += 0.37;
        }
    }

    #[test]
    fn test_ramp_darkens_with_depth() {
        let scale = DepthScale::default();
        let mut previous = f64::INFINITY;
        for depth in [0.0, 2.0, 4.0, 7.0, 15.0, 100.0] {
            let lum = scale.classify(depth).luminance();
            assert!(lum < previous, "depth {depth} should be darker");
            previous = lum;
        }
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let err = DepthScale::from_breakpoints(&[1.0, 5.0, 3.0], &["#000000"; 4]).unwrap_err();
        assert!(matches!(err, MapError::InvalidScale(_)));

        let err = DepthScale::from_breakpoints(&[1.0, 1.0], &["#000000"; 3]).unwrap_err();
        assert!(matches!(err, MapError::InvalidScale(_)));
    }

    #[test]
    fn test_rejects_color_count_mismatch() {
        assert!(DepthScale::from_breakpoints(&[1.0, 3.0], &["#000000", "#FFFFFF"]).is_err());
        assert!(DepthScale::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_bounded_last_bin() {
        let bins = vec![
            ColorBin::new(1.0, color("#111111")),
            ColorBin::new(3.0, color("#222222")),
            ColorBin::new(5.0, color("#333333")),
        ];
        let err = DepthScale::new(bins).unwrap_err();
        assert!(matches!(err, MapError::InvalidScale(_)));

        let json = r##"{"bins":[{"threshold":1.0,"color":"#111111"},{"threshold":5.0,"color":"#333333"}]}"##;
        assert!(serde_json::from_str::<DepthScale>(json).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok = r##"{"bins":[{"threshold":2.0,"color":"#111111"},{"threshold":null,"color":"#222222"}]}"##;
        let scale = serde_json::from_str::<DepthScale>(ok).unwrap();
        assert!(scale.bins()[1].is_unbounded());
        assert_eq!(scale.classify(50.0), color("#222222"));

        let bad = r##"{"bins":[{"threshold":2.0,"color":"#111111"},{"threshold":1.0,"color":"#222222"}]}"##;
        assert!(serde_json::from_str::<DepthScale>(bad).is_err());
    }

    #[test]
    fn test_serialized_scale_reloads() {
        let scale = DepthScale::default();
        let json = serde_json::to_string(&scale).unwrap();
        assert!(json.contains("null"));
        assert_eq!(serde_json::from_str::<DepthScale>(&json).unwrap(), scale);
    }
}
