//! Distance between points given in decimal degrees, measured along the
//! WGS84 ellipsoid.

use geo::{GeodesicDistance, Point};

use shared_models::domain::Address;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<&Address> for Coordinates {
    fn from(address: &Address) -> Self {
        Self::new(address.latitude, address.longitude)
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(c: Coordinates) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

/// Geodesic (Karney) distance in kilometres.
pub fn geodesic_km(from: Coordinates, to: Coordinates) -> f64 {
    Point::from(from).geodesic_distance(&Point::from(to)) / 1000.0
}

/// Sorts `items` by ascending distance from `origin`. Items without a position
/// sort last; ties keep their input order.
pub fn sort_by_distance<T, F>(items: &mut [T], origin: Coordinates, position: F)
where
    F: Fn(&T) -> Option<Coordinates>,
{
    items.sort_by(|a, b| {
        let da = position(a).map(|p| geodesic_km(origin, p)).unwrap_or(f64::INFINITY);
        let db = position(b).map(|p| geodesic_km(origin, p)).unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
}
