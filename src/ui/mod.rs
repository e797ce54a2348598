pub mod controls;
pub mod legend;
pub mod popup;

pub use controls::{LayerControl, LayerControlEntry, LayerKind, Position};
pub use legend::LegendControl;
pub use popup::{Popup, PopupManager};
