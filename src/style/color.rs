use crate::{MapError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An opaque `#RRGGBB` color, stored normalized to upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is required)
    pub fn parse(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| MapError::InvalidScale(format!("expected #RRGGBB color, got {s:?}")))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| MapError::InvalidScale(format!("invalid hex digits in {s:?}")))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Relative luminance in `[0, 1]` (Rec. 709 weights, no gamma)
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_normalize_case() {
        let color = HexColor::parse("#fed976").unwrap();
        assert_eq!(color, HexColor::rgb(0xFE, 0xD9, 0x76));
        assert_eq!(color.to_string(), "#FED976");
    }

    #[test]
    fn test_rejects_malformed_colors() {
        for bad in ["FED976", "#FED97", "#GGGGGG", "red", "#FED9766", "", "#+1+2+3"] {
            assert!(HexColor::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let color: HexColor = serde_json::from_str("\"#800026\"").unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#800026\"");
        assert!(serde_json::from_str::<HexColor>("\"blue\"").is_err());
    }

    #[test]
    fn test_luminance_orders_ramp() {
        let light = HexColor::parse("#FED976").unwrap();
        let dark = HexColor::parse("#800026").unwrap();
        assert!(light.luminance() > dark.luminance());
    }
}
