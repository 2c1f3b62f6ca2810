//! Create Carga Handler

use freight::postings::Location;
use freight_app::domain::cargas::{data::NewCarga, records::CargaUuid};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cargas::{CargaResponse, errors::into_status_error},
    extensions::*,
    payloads::{LocationPayload, RateRequest, parse_date, resolve_locations},
};

/// Create Carga Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCargaRequest {
    /// Client-chosen UUID; generated when absent
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub origin: LocationPayload,
    pub destination: LocationPayload,
    pub cargo_type: String,
    pub truck_type: String,
    #[serde(default)]
    pub rate: Option<RateRequest>,

    /// Last day the load is offered, `YYYY-MM-DD`
    #[serde(default)]
    pub available_until: Option<String>,
}

/// Create Carga Handler
///
/// Posts a load for the signed-in shipper. Endpoints without coordinates
/// are geocoded before saving.
#[endpoint(
    tags("cargas"),
    summary = "Create Carga",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Carga created"),
        (status_code = StatusCode::CONFLICT, description = "Carga already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCargaRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;
    let request = json.into_inner();

    let origin = Location::try_from(request.origin).or_400("invalid origin")?;
    let destination = Location::try_from(request.destination).or_400("invalid destination")?;
    let rate = request
        .rate
        .map(TryInto::try_into)
        .transpose()
        .or_400("invalid rate")?;
    let available_until = parse_date(request.available_until).or_400("invalid available_until")?;

    let locations = resolve_locations(state, origin, Some(destination))
        .await
        .or_400("invalid locations")?;

    let Some(destination) = locations.destination else {
        return Err(StatusError::bad_request().brief("destination is required"));
    };

    let new_carga = NewCarga {
        uuid: request.uuid.map_or_else(CargaUuid::new, CargaUuid::from_uuid),
        origin: locations.origin,
        destination,
        cargo_type: request.cargo_type,
        truck_type: request.truck_type,
        rate,
        available_until,
    };

    let carga = state
        .app
        .cargas
        .create_carga(owner, new_carga)
        .await
        .map_err(into_status_error)?;

    match state.app.alerts.matching_alerts(&carga).await {
        Ok(alerts) if !alerts.is_empty() => {
            info!(carga = %carga.uuid, matches = alerts.len(), "carga matches saved alerts");
        }
        Ok(_) => {}
        Err(error) => warn!(carga = %carga.uuid, %error, "failed to match alerts"),
    }

    res.add_header(LOCATION, format!("/cargas/{}", carga.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(carga.into()))
}
