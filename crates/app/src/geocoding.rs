//! Geocoding client for the map provider's address lookup endpoint.

use std::time::Duration;

use async_trait::async_trait;
use freight::{
    geo::{Coordinates, GeoError},
    postings::Location,
};
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Production endpoint host.
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com";

/// Upper bound on one lookup, connect to last byte.
pub const DEFAULT_GEOCODING_TIMEOUT: Duration = Duration::from_secs(5);

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    /// Scheme and host, e.g. `"https://maps.googleapis.com"`.
    pub base_url: String,

    /// Provider key; without one every lookup fails with
    /// [`GeocodingError::MissingCredential`].
    pub api_key: Option<String>,

    /// A lookup still pending after this fails with a timeout error.
    pub timeout: Duration,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_GEOCODING_TIMEOUT,
        }
    }
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub formatted_address: Option<String>,
    pub coordinates: Coordinates,

    /// `administrative_area_level_1`
    pub province: Option<String>,

    /// `locality`
    pub city: Option<String>,
}

/// Errors that can occur when geocoding.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// No provider key is configured.
    #[error("no geocoding credential configured")]
    MissingCredential,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a status other than `OK`/`ZERO_RESULTS`.
    #[error("geocoding failed with status {0}")]
    Status(String),

    /// The provider returned coordinates outside the valid range.
    #[error("provider returned invalid coordinates")]
    InvalidCoordinates(#[from] GeoError),
}

#[automock]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address`; `Ok(None)` when the provider has no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>, GeocodingError>;
}

/// HTTP client for the geocoding endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    config: GeocodingConfig,
    http: Client,
}

impl GeocodingClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: GeocodingConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedPlace>, GeocodingError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GeocodingError::MissingCredential)?;

        let url = format!("{}{GEOCODE_PATH}", self.config.base_url.trim_end_matches('/'));

        let response: GeocodeResponse = self
            .http
            .get(&url)
            .query(&[("address", address), ("key", api_key)])
            .timeout(self.config.timeout)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_place()
    }
}

/// Fill in coordinates, province and city of an unresolved location.
///
/// Failures are logged and leave the location as it was. Returns whether the
/// location ends up resolved.
pub async fn fill_missing(geocoder: &dyn Geocoder, location: &mut Location) -> bool {
    if !location.is_unresolved() {
        return true;
    }

    match geocoder.geocode(&location.address).await {
        Ok(Some(place)) => {
            location.coordinates = Some(place.coordinates);

            if location.province.is_none() {
                location.province = place.province;
            }

            if location.city.is_none() {
                location.city = place.city;
            }

            true
        }
        Ok(None) => {
            debug!(address = %location.address, "no geocoding match");

            false
        }
        Err(error) => {
            warn!(address = %location.address, %error, "geocoding failed");

            false
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,

    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: Option<String>,

    geometry: Geometry,

    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,

    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResponse {
    fn into_place(self) -> Result<Option<GeocodedPlace>, GeocodingError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(None),
            _ => return Err(GeocodingError::Status(self.status)),
        }

        let Some(result) = self.results.into_iter().next() else {
            return Ok(None);
        };

        let component = |kind: &str| {
            result
                .address_components
                .iter()
                .find(|component| component.types.iter().any(|t| t == kind))
                .map(|component| component.long_name.clone())
        };

        Ok(Some(GeocodedPlace {
            coordinates: Coordinates::new(
                result.geometry.location.lat,
                result.geometry.location.lng,
            )?,
            province: component("administrative_area_level_1"),
            city: component("locality"),
            formatted_address: result.formatted_address.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const ROSARIO: &str = r#"{
        "status": "OK",
        "results": [{
            "formatted_address": "Rosario, Santa Fe Province, Argentina",
            "geometry": { "location": { "lat": -32.9442426, "lng": -60.6505388 } },
            "address_components": [
                { "long_name": "Rosario", "types": ["locality", "political"] },
                { "long_name": "Santa Fe", "types": ["administrative_area_level_1", "political"] },
                { "long_name": "Argentina", "types": ["country", "political"] }
            ]
        }]
    }"#;

    #[test]
    fn ok_responses_yield_province_and_city() -> TestResult {
        let response: GeocodeResponse = serde_json::from_str(ROSARIO)?;
        let place = response.into_place()?.ok_or("no place")?;

        assert_eq!(place.province.as_deref(), Some("Santa Fe"));
        assert_eq!(place.city.as_deref(), Some("Rosario"));
        assert_eq!(place.coordinates, Coordinates::new(-32.9442426, -60.6505388)?);

        Ok(())
    }

    #[test]
    fn zero_results_is_not_an_error() -> TestResult {
        let response: GeocodeResponse = serde_json::from_str(r#"{"status":"ZERO_RESULTS"}"#)?;

        assert_eq!(response.into_place()?, None);

        Ok(())
    }

    #[test]
    fn other_statuses_are_errors() -> TestResult {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"status":"REQUEST_DENIED","results":[]}"#)?;

        assert!(matches!(
            response.into_place(),
            Err(GeocodingError::Status(status)) if status == "REQUEST_DENIED"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_a_request() {
        let client = GeocodingClient::new(GeocodingConfig::default());

        let result = client.geocode("Rosario").await;

        assert!(matches!(result, Err(GeocodingError::MissingCredential)));
    }

    #[tokio::test]
    async fn unresponsive_providers_time_out() -> TestResult {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        // Accept connections and never answer.
        let server = tokio::spawn(async move {
            let mut held = Vec::new();

            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let client = GeocodingClient::new(GeocodingConfig {
            base_url,
            api_key: Some("test-key".to_string()),
            timeout: Duration::from_millis(100),
        });

        let result = client.geocode("Rosario").await;

        server.abort();

        assert!(
            matches!(&result, Err(GeocodingError::Http(error)) if error.is_timeout()),
            "expected a timeout, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn fill_missing_keeps_typed_province() -> TestResult {
        let mut geocoder = MockGeocoder::new();

        geocoder.expect_geocode().times(1).returning(|_| {
            Ok(Some(GeocodedPlace {
                formatted_address: None,
                coordinates: Coordinates::new(-31.4201, -64.1888)?,
                province: Some("Córdoba".to_string()),
                city: Some("Córdoba".to_string()),
            }))
        });

        let mut location = Location::from_address("Av. Colón 100")?;
        location.province = Some("Cordoba".to_string());

        assert!(fill_missing(&geocoder, &mut location).await);
        assert_eq!(location.province.as_deref(), Some("Cordoba"));
        assert_eq!(location.city.as_deref(), Some("Córdoba"));
        assert!(!location.is_unresolved());

        Ok(())
    }

    #[tokio::test]
    async fn fill_missing_swallows_failures() -> TestResult {
        let mut geocoder = MockGeocoder::new();

        geocoder
            .expect_geocode()
            .returning(|_| Err(GeocodingError::Status("OVER_QUERY_LIMIT".to_string())));

        let mut location = Location::from_address("Ruta 9 km 300")?;

        assert!(!fill_missing(&geocoder, &mut location).await);
        assert!(location.is_unresolved());

        Ok(())
    }

    #[tokio::test]
    async fn resolved_locations_are_left_alone() -> TestResult {
        let geocoder = MockGeocoder::new();

        let mut location = Location::from_address("Obelisco")?;
        location.coordinates = Some(Coordinates::new(-34.6037, -58.3816)?);

        assert!(fill_missing(&geocoder, &mut location).await);

        Ok(())
    }
}
