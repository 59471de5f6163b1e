pub mod chains;
pub mod cluster;
pub mod etl;
pub mod filter;
pub mod geo;
pub mod stats;

pub use crate::domain::model::{Amenity, GeoPoint, Listing, LoadReport, Restaurant};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
