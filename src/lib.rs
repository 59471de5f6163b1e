pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

pub use adapters::LocalStorage;
pub use app::pipelines::{AirbnbPipeline, RestaurantPipeline};
pub use config::{AirbnbArgs, AirbnbConfig, RestaurantArgs, RestaurantConfig};
pub use core::etl::EtlEngine;
pub use utils::error::{InsightError, Result};
