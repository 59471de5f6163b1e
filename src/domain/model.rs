use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Vancouver city centre, the default map view.
pub const VANCOUVER: GeoPoint = GeoPoint {
    lat: 49.246292,
    lon: -123.116226,
};

/// One Airbnb listing. Numeric columns the source leaves blank or garbled are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: u64,
    pub name: String,
    pub host_id: Option<u64>,
    pub host_name: String,
    pub host_acceptance_rate: Option<f64>,
    pub host_identity_verified: bool,
    pub location: GeoPoint,
    pub neighbourhood: String,
    pub city: String,
    pub country: String,
    pub zipcode: String,
    pub price: Option<f64>,
    pub accommodates: Option<u32>,
    pub min_nights: Option<u32>,
    pub num_reviews: u32,
    pub review_score: Option<f64>,
}

/// One OpenStreetMap amenity node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub lat: f64,
    pub lon: f64,
    pub amenity: String,
    pub name: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, serde_json::Value>,
}

impl Amenity {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestaurantClass {
    Chain,
    NonChain,
}

/// A restaurant amenity together with the size of the group its name belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub amenity: Amenity,
    pub total_branches: usize,
    pub class: RestaurantClass,
}

/// What a pipeline's load stage left on disk.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub output_dir: PathBuf,
    pub artifacts: Vec<String>,
}

impl LoadReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            artifacts: Vec::new(),
        }
    }

    pub fn record(&mut self, artifact: impl Into<String>) {
        self.artifacts.push(artifact.into());
    }
}
