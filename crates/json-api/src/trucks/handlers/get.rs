//! Get Truck Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    trucks::{TruckResponse, errors::into_status_error},
};

/// Get Truck Handler
#[endpoint(
    tags("trucks"),
    summary = "Get Truck",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    truck: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TruckResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let truck = state
        .app
        .trucks
        .get_truck(truck.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(truck.into()))
}
