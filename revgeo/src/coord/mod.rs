//! Geographic coordinates and great-circle distance.
//!
//! [`Coordinate`] is the validated input to every lookup. Distances between
//! a query and candidate places use the haversine formula, which is accurate
//! for the short ranges a sector neighbourhood covers.

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Calculate the great-circle distance between two positions.
///
/// # Arguments
///
/// * `from` - First position as (latitude, longitude) in degrees
/// * `to` - Second position as (latitude, longitude) in degrees
///
/// # Returns
///
/// Distance in kilometres.
///
/// # Example
///
/// ```
/// use revgeo::coord::distance_km;
///
/// // One degree of latitude is roughly 111 km
/// let dist = distance_km((0.0, 0.0), (1.0, 0.0));
/// assert!((dist - 111.2).abs() < 0.5);
/// ```
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` marginally above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

impl Coordinate {
    /// Great-circle distance to another position, in kilometres.
    #[inline]
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        distance_km((self.latitude(), self.longitude()), (latitude, longitude))
    }
}
