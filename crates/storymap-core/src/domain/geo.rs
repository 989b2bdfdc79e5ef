use serde::{Deserialize, Serialize};

/// Mean earth radius in metres, per the spherical model used by
/// geodesic distance queries.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic point. Serializes in the GeoJSON "Point" convention:
/// `{"type": "Point", "coordinates": [lng, lat]}` - longitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Build a point from latitude/longitude, rejecting non-finite or
    /// out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lng, lat })
    }

    /// Great-circle distance to another point in metres (haversine,
    /// spherical earth).
    pub fn haversine_distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("GeoPoint", 2)?;
        s.serialize_field("type", "Point")?;
        s.serialize_field("coordinates", &[self.lng, self.lat])?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct GeoJsonPoint {
            coordinates: [f64; 2],
        }

        let point = GeoJsonPoint::deserialize(deserializer)?;
        let [lng, lat] = point.coordinates;
        GeoPoint::new(lat, lng)
            .ok_or_else(|| serde::de::Error::custom("coordinates out of range"))
    }
}
