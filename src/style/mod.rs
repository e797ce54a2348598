//! Feature styling: depth classification, magnitude scaling and legend binning.

pub mod classifier;
pub mod color;
pub mod legend;
pub mod marker;
pub mod scaler;

pub use classifier::{classify, ColorBin, DepthScale};
pub use color::HexColor;
pub use legend::{legend_entries, LegendEntry};
pub use marker::{style_feature, MarkerStyle};
pub use scaler::radius;
