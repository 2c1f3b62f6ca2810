//! Truck Map Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    map::models::{MarkerResponse, markers},
    observability::observe_degraded,
    payloads::{CapabilityResponse, map_capability, posting_filter},
    trucks::TruckResponse,
};

/// Trucks on the map, with their markers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TruckMapResponse {
    pub sequence: u64,
    pub stale: bool,
    pub degraded: bool,
    pub grace_days: u32,
    pub capability: CapabilityResponse,
    pub markers: Vec<MarkerResponse>,
    pub trucks: Vec<TruckResponse>,
}

/// Truck Map Handler
#[endpoint(
    tags("map"),
    summary = "Map Trucks",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    origin: QueryParam<String, false>,
    destination: QueryParam<String, false>,
    truck_type: QueryParam<String, false>,
    today: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<TruckMapResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;
    let today = today.into_today()?;
    let filter = posting_filter(origin, destination, truck_type);

    let feed = state.app.feeds.feed(user);
    let update = feed.refresh_trucks(&state.app.query, &filter, today).await;

    if update.closed {
        return Err(StatusError::gone().brief("Map feed was closed"));
    }

    if update.current.degraded {
        observe_degraded("map_trucks");
    }

    let capability = map_capability(state).await;

    Ok(Json(TruckMapResponse {
        sequence: update.sequence,
        stale: update.stale,
        degraded: update.current.degraded,
        grace_days: update.current.grace.as_days(),
        capability: capability.into(),
        markers: markers(&update.current.rows),
        trucks: update.current.rows.into_iter().map(Into::into).collect(),
    }))
}
