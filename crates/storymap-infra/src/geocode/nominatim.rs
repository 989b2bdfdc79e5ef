//! Nominatim reverse-geocoding client.
//!
//! One bounded outbound call per lookup, no retries. Every failure mode
//! (connect error, timeout, non-2xx, malformed body, no country in the
//! address) collapses to `None`; enrichment callers proceed without
//! country data.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use storymap_core::ports::{CountryInfo, Geocoder};

/// Client identifier sent with every request, as Nominatim's usage
/// policy requires.
const USER_AGENT: &str = "StoryMapApp/1.0";

/// Zoom level 3 resolves to country granularity.
const ZOOM: &str = "3";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl NominatimConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GEOCODER_BASE_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("GEOCODER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Shape of the `/reverse?format=json` response, reduced to the fields
/// we read.
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    country: Option<String>,
    country_code: Option<String>,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    fn parse(body: ReverseResponse) -> Option<CountryInfo> {
        let address = body.address?;
        let country = address.country?;
        Some(CountryInfo {
            country,
            country_code: address.country_code.map(|c| c.to_uppercase()),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<CountryInfo> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", &lat.to_string()),
                ("lon", &lng.to_string()),
                ("zoom", ZOOM),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(lat, lng, error = %e, "reverse geocode request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(lat, lng, status = %response.status(), "reverse geocode non-success status");
            return None;
        }

        let body = match response.json::<ReverseResponse>().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(lat, lng, error = %e, "reverse geocode body malformed");
                return None;
            }
        };

        Self::parse(body)
    }
}
