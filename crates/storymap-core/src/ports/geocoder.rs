use async_trait::async_trait;

/// Country resolved from a coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub country: String,
    /// Uppercase ISO code, e.g. "VN". `None` when the provider names
    /// the country but omits the code.
    pub country_code: Option<String>,
}

/// Reverse-geocoding port - resolves lat/lng to a country.
///
/// Enrichment is always best-effort: implementations bound the remote
/// call with a timeout and map every failure mode (timeout, non-2xx,
/// malformed body, no country in the response) to `None` after logging.
/// They never surface an error to the caller and never retry.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<CountryInfo>;
}
