//! Reverse-geocoding client implementations.

mod nominatim;

pub use nominatim::{NominatimConfig, NominatimGeocoder};
