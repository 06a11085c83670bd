//! Geographic coordinates.

use geo::{HaversineDistance, Point};

/// A WGS84 coordinate: latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Straight-line (haversine) distance to another coordinate, in meters.
    ///
    /// This is the crow-flies distance used by the geofence and by
    /// suggestion ordering. Road distance is the router's concern.
    pub fn haversine_meters(&self, other: &Coordinate) -> f64 {
        let a = Point::new(self.lon, self.lat);
        let b = Point::new(other.lon, other.lat);
        a.haversine_distance(&b)
    }
}
