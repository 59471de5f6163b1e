use crate::domain::model::GeoPoint;
use serde::Serialize;

/// Mean and sample standard deviation of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpatialSummary {
    pub count: usize,
    pub mean_lat: f64,
    pub mean_lon: f64,
    pub std_lat: f64,
    pub std_lon: f64,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). `NaN` for fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

impl SpatialSummary {
    pub fn of(points: &[GeoPoint]) -> Self {
        let lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
        let lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
        Self {
            count: points.len(),
            mean_lat: mean(&lats),
            mean_lon: mean(&lons),
            std_lat: sample_std(&lats),
            std_lon: sample_std(&lons),
        }
    }
}
