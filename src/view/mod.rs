//! Headless map view: projection of stations onto the viewport and the
//! controller that recomputes circles when the time slider moves.

pub mod controller;
pub mod projection;

pub use controller::{StationMarker, TrafficView};
pub use projection::{Projector, ScreenPoint, WebMercator};
