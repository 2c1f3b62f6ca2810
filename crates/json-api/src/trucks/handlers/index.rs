//! Truck Index Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*, observability::observe_degraded, payloads::posting_filter,
    trucks::TruckResponse,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TrucksResponse {
    pub trucks: Vec<TruckResponse>,
    pub degraded: bool,
    pub grace_days: u32,
}

/// Truck Index Handler
#[endpoint(
    tags("trucks"),
    summary = "List Trucks",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    origin: QueryParam<String, false>,
    destination: QueryParam<String, false>,
    truck_type: QueryParam<String, false>,
    today: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<TrucksResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let today = today.into_today()?;
    let filter = posting_filter(origin, destination, truck_type);

    let fetched = state.app.query.fetch_trucks(&filter, today).await;

    if fetched.degraded {
        observe_degraded("trucks");
    }

    Ok(Json(TrucksResponse {
        trucks: fetched.rows.into_iter().map(Into::into).collect(),
        degraded: fetched.degraded,
        grace_days: fetched.grace.as_days(),
    }))
}
