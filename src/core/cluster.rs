use crate::domain::model::GeoPoint;

const MAX_ITERATIONS: usize = 300;

#[derive(Debug, Clone)]
pub struct Clustering {
    pub centers: Vec<GeoPoint>,
    /// Cluster index for each input point, in input order.
    pub assignments: Vec<usize>,
    pub iterations: usize,
}

impl Clustering {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for &cluster in &self.assignments {
            sizes[cluster] += 1;
        }
        sizes
    }
}

/// Squared distance in degree space.
fn distance_sq(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = a.lat - b.lat;
    let dlon = a.lon - b.lon;
    dlat * dlat + dlon * dlon
}

fn nearest(point: GeoPoint, centers: &[GeoPoint]) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance_sq(point, *c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Farthest-point seeding starting from the first point. Stops early when
/// every remaining point coincides with a chosen seed.
fn seed_centers(points: &[GeoPoint], k: usize) -> Vec<GeoPoint> {
    let mut centers = vec![points[0]];
    let mut closest: Vec<f64> = points.iter().map(|p| distance_sq(*p, points[0])).collect();

    while centers.len() < k {
        let (index, farthest) = closest
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, d)| (i, *d))
            .unwrap_or((0, 0.0));
        if farthest <= 0.0 {
            break;
        }

        let center = points[index];
        centers.push(center);
        for (d, p) in closest.iter_mut().zip(points) {
            *d = d.min(distance_sq(*p, center));
        }
    }

    centers
}

/// Lloyd's k-means over latitude/longitude. Deterministic for a given input
/// order. `k` shrinks to the number of distinct points when there are fewer.
pub fn kmeans(points: &[GeoPoint], k: usize) -> Clustering {
    if points.is_empty() || k == 0 {
        return Clustering {
            centers: Vec::new(),
            assignments: Vec::new(),
            iterations: 0,
        };
    }

    let mut centers = seed_centers(points, k);
    let mut assignments: Vec<usize> = points.iter().map(|p| nearest(*p, &centers)).collect();
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let mut sums = vec![(0.0, 0.0, 0usize); centers.len()];
        for (point, &cluster) in points.iter().zip(&assignments) {
            let entry = &mut sums[cluster];
            entry.0 += point.lat;
            entry.1 += point.lon;
            entry.2 += 1;
        }
        for (center, (lat, lon, count)) in centers.iter_mut().zip(sums) {
            // An emptied cluster keeps its previous centre.
            if count > 0 {
                *center = GeoPoint::new(lat / count as f64, lon / count as f64);
            }
        }

        let next: Vec<usize> = points.iter().map(|p| nearest(*p, &centers)).collect();
        if next == assignments {
            break;
        }
        assignments = next;
    }

    tracing::debug!(
        "k-means converged after {} iterations with {} clusters",
        iterations,
        centers.len()
    );

    Clustering {
        centers,
        assignments,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(lat: f64, lon: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(lat, lon),
            GeoPoint::new(lat + 0.001, lon),
            GeoPoint::new(lat, lon + 0.001),
            GeoPoint::new(lat - 0.001, lon - 0.001),
        ]
    }

    #[test]
    fn test_two_blobs_get_one_center_each() {
        let mut points = blob(49.28, -123.12);
        points.extend(blob(49.22, -123.02));

        let clustering = kmeans(&points, 2);

        assert_eq!(clustering.centers.len(), 2);
        assert_eq!(clustering.cluster_sizes(), vec![4, 4]);
        assert!(clustering.assignments[..4].iter().all(|&c| c == clustering.assignments[0]));
        assert!(clustering.assignments[4..].iter().all(|&c| c == clustering.assignments[4]));
        assert_ne!(clustering.assignments[0], clustering.assignments[4]);

        let first = clustering.centers[clustering.assignments[0]];
        assert!((first.lat - 49.28).abs() < 0.001);
        assert!((first.lon + 123.12).abs() < 0.001);
    }

    #[test]
    fn test_k_shrinks_to_distinct_points() {
        let points = vec![GeoPoint::new(49.0, -123.0); 3];
        let clustering = kmeans(&points, 10);
        assert_eq!(clustering.centers.len(), 1);
        assert_eq!(clustering.assignments, vec![0, 0, 0]);
    }

    #[test]
    fn test_empty_input() {
        let clustering = kmeans(&[], 10);
        assert!(clustering.centers.is_empty());
        assert!(clustering.assignments.is_empty());
    }
}
