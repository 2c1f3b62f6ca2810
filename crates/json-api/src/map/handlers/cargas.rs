//! Carga Map Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    cargas::CargaResponse,
    extensions::*,
    map::models::{MarkerResponse, markers},
    observability::observe_degraded,
    payloads::{CapabilityResponse, map_capability, posting_filter},
};

/// Cargas on the map, with their markers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CargaMapResponse {
    /// Ticket issued to this refresh
    pub sequence: u64,

    /// A newer refresh overtook this one; the payload is the newer state
    pub stale: bool,
    pub degraded: bool,
    pub grace_days: u32,
    pub capability: CapabilityResponse,
    pub markers: Vec<MarkerResponse>,
    pub cargas: Vec<CargaResponse>,
}

/// Carga Map Handler
///
/// Refreshes the caller's map feed. Only the latest refresh replaces what the
/// feed holds.
#[endpoint(
    tags("map"),
    summary = "Map Cargas",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    origin: QueryParam<String, false>,
    destination: QueryParam<String, false>,
    truck_type: QueryParam<String, false>,
    today: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CargaMapResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;
    let today = today.into_today()?;
    let filter = posting_filter(origin, destination, truck_type);

    let feed = state.app.feeds.feed(user);
    let update = feed.refresh_cargas(&state.app.query, &filter, today).await;

    if update.closed {
        return Err(StatusError::gone().brief("Map feed was closed"));
    }

    if update.current.degraded {
        observe_degraded("map_cargas");
    }

    let capability = map_capability(state).await;

    Ok(Json(CargaMapResponse {
        sequence: update.sequence,
        stale: update.stale,
        degraded: update.current.degraded,
        grace_days: update.current.grace.as_days(),
        capability: capability.into(),
        markers: markers(&update.current.rows),
        cargas: update.current.rows.into_iter().map(Into::into).collect(),
    }))
}
