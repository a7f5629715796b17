//! Thread-safe handle to a single geocoder.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{GeocoderError, ReverseGeocoder};
use crate::coord::Coordinate;
use crate::store::Place;

/// Cloneable handle that serializes lookups on one [`ReverseGeocoder`].
///
/// SQLite connections must not be used from two threads at once; every call
/// here takes the lock for the duration of one lookup.
///
/// # Example
///
/// ```ignore
/// use revgeo::geocoder::{ReverseGeocoder, SharedGeocoder};
///
/// let shared = SharedGeocoder::new(ReverseGeocoder::open_default()?);
/// let worker = shared.clone();
/// std::thread::spawn(move || worker.place_for_lat_lon(48.85, 2.35));
/// ```
#[derive(Debug, Clone)]
pub struct SharedGeocoder {
    inner: Arc<Mutex<ReverseGeocoder>>,
}

impl SharedGeocoder {
    /// Wrap a geocoder for shared use.
    pub fn new(geocoder: ReverseGeocoder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(geocoder)),
        }
    }

    /// See [`ReverseGeocoder::place_for`].
    pub fn place_for(&self, coordinate: &Coordinate) -> Result<String, GeocoderError> {
        self.inner.lock().place_for(coordinate)
    }

    /// See [`ReverseGeocoder::place_for_lat_lon`].
    pub fn place_for_lat_lon(&self, latitude: f64, longitude: f64) -> Result<String, GeocoderError> {
        self.inner.lock().place_for_lat_lon(latitude, longitude)
    }

    /// See [`ReverseGeocoder::nearest_place`].
    pub fn nearest_place(&self, coordinate: &Coordinate) -> Result<Option<Place>, GeocoderError> {
        self.inner.lock().nearest_place(coordinate)
    }

    /// Run `f` with exclusive access to the geocoder.
    pub fn with<R>(&self, f: impl FnOnce(&mut ReverseGeocoder) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

impl From<ReverseGeocoder> for SharedGeocoder {
    fn from(geocoder: ReverseGeocoder) -> Self {
        Self::new(geocoder)
    }
}
