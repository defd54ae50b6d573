//! Great-circle distance between coordinates.

use crate::types::Coordinate;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two points given in decimal degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

impl Coordinate {
    /// Distance in meters from this fix to another point
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_distance(self.latitude, self.longitude, latitude, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points() {
        assert_eq!(haversine_distance(52.2297, 21.0122, 52.2297, 21.0122), 0.0);
        assert_eq!(haversine_distance(-89.9, 179.9, -89.9, 179.9), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 50.0, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let a = haversine_distance(52.2297, 21.0122, 48.8566, 2.3522);
        let b = haversine_distance(48.8566, 2.3522, 52.2297, 21.0122);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn test_warsaw_to_paris() {
        // Roughly 1,366 km
        let d = haversine_distance(52.2297, 21.0122, 48.8566, 2.3522);
        assert!((d - 1_366_000.0).abs() < 5_000.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        for step in 0..=1780 {
            let lat = -88.7 + f64::from(step) * 0.1;
            let d = haversine_distance(lat, 10.0, -lat, -170.0);
            assert!(d.is_finite(), "NaN at lat {}", lat);
            assert!((d - half_circumference).abs() < 1.0, "lat {} got {}", lat, d);
        }
    }

    #[test]
    fn test_coordinate_distance_to() {
        let c = Coordinate::precise(0.0, 0.0, 5.0);
        assert!((c.distance_to(0.0, 1.0) - 111_195.0).abs() < 50.0);
    }
}
