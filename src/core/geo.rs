use crate::domain::model::GeoPoint;
use crate::utils::error::{InsightError, Result};
use crate::utils::validation::validate_range;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude/longitude rectangle, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lon_min: f64,
    pub lat_max: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Square box of `half_side_km` around `center`, using a spherical Earth.
    pub fn around(center: GeoPoint, half_side_km: f64) -> Result<Self> {
        if !(half_side_km > 0.0) {
            return Err(InsightError::InvalidConfigValueError {
                field: "radius_km".to_string(),
                value: half_side_km.to_string(),
                reason: "Half side must be greater than 0".to_string(),
            });
        }
        validate_range("latitude", center.lat, -90.0, 90.0)?;
        validate_range("longitude", center.lon, -180.0, 180.0)?;

        let lat = center.lat.to_radians();
        let lon = center.lon.to_radians();
        let parallel_radius = EARTH_RADIUS_KM * lat.cos();

        let lat_delta = half_side_km / EARTH_RADIUS_KM;
        let lon_delta = half_side_km / parallel_radius;

        Ok(Self {
            lat_min: (lat - lat_delta).to_degrees(),
            lon_min: (lon - lon_delta).to_degrees(),
            lat_max: (lat + lat_delta).to_degrees(),
            lon_max: (lon + lon_delta).to_degrees(),
        })
    }

    /// Strict containment; points on the edge are outside.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat > self.lat_min
            && point.lat < self.lat_max
            && point.lon > self.lon_min
            && point.lon < self.lon_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_km_box_in_vancouver() {
        let center = GeoPoint::new(49.25, -123.1);
        let bbox = BoundingBox::around(center, 5.0).unwrap();

        let lat_half = (bbox.lat_max - bbox.lat_min) / 2.0;
        assert!((lat_half - 0.04497).abs() < 1e-4);

        // Meridians converge, so the longitude span is wider than the latitude span.
        let lon_half = (bbox.lon_max - bbox.lon_min) / 2.0;
        assert!((lon_half - 0.06889).abs() < 1e-4);
        assert!(bbox.contains(center));
        assert!(!bbox.contains(GeoPoint::new(49.4, -123.1)));
    }

    #[test]
    fn test_edge_is_outside() {
        let bbox = BoundingBox::around(GeoPoint::new(0.0, 0.0), 10.0).unwrap();
        assert!(!bbox.contains(GeoPoint::new(bbox.lat_max, 0.0)));
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        assert!(BoundingBox::around(GeoPoint::new(49.0, -123.0), 0.0).is_err());
        assert!(BoundingBox::around(GeoPoint::new(95.0, -123.0), 5.0).is_err());
        assert!(BoundingBox::around(GeoPoint::new(49.0, -190.0), 5.0).is_err());
    }
}
