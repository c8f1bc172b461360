use crate::error::{GeoError, Result};
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A point on the Earth's surface in decimal degrees.
///
/// Equality and hashing use the exact bit pattern of both coordinates, so two
/// locations are the same only when their coordinates are identical.
/// Near-duplicates (e.g. 42.0 and 42.0000001) remain distinct.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Location {
    /// Latitude in decimal degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in decimal degrees, within [-180, 180]
    pub longitude: f64,
}

/// The location a forecast is requested for.
pub type QueryPoint = Location;

impl Location {
    /// Build a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Validation(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Validation(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Location {
            latitude,
            longitude,
        })
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Location) -> f64 {
        gst_utils::geo::haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Bit-level identity of the coordinates; -0.0 is folded onto 0.0.
    fn key(&self) -> (u64, u64) {
        ((self.latitude + 0.0).to_bits(), (self.longitude + 0.0).to_bits())
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Location {}

impl Hash for Location {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
