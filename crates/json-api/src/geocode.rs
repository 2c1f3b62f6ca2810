//! Geocode Handler

use freight_app::geocoding::GeocodingError;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extensions::*;

/// Geocode Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct GeocodeRequest {
    pub address: String,
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct GeocodeResponse {
    pub formatted_address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub province: Option<String>,
    pub city: Option<String>,
}

fn into_status_error(error: GeocodingError) -> StatusError {
    match error {
        GeocodingError::MissingCredential => {
            StatusError::service_unavailable().brief("Geocoding is not configured")
        }
        error => {
            warn!(%error, "geocoding request failed");

            StatusError::bad_gateway().brief("Geocoding provider failed")
        }
    }
}

/// Geocode Handler
///
/// Resolves a free-text address through the mapping provider.
#[endpoint(
    tags("map"),
    summary = "Geocode Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Address resolved"),
        (status_code = StatusCode::NOT_FOUND, description = "No results"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Provider error"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "No provider credential"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<GeocodeRequest>,
    depot: &mut Depot,
) -> Result<Json<GeocodeResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let address = json.into_inner().address;
    let address = address.trim();

    if address.is_empty() {
        return Err(StatusError::bad_request().brief("address is required"));
    }

    let place = state
        .app
        .geocoder
        .geocode(address)
        .await
        .map_err(into_status_error)?
        .ok_or_else(|| StatusError::not_found().brief("No results for address"))?;

    Ok(Json(GeocodeResponse {
        formatted_address: place.formatted_address,
        lat: place.coordinates.lat(),
        lng: place.coordinates.lng(),
        province: place.province,
        city: place.city,
    }))
}
