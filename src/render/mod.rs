pub mod charts;
pub mod map;

pub use map::{Layer, LeafletMap, Pin};
