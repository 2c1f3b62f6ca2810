//! Carga Info Window Handler

use freight::{map::MapView, postings::EndpointKind};
use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{cargas::into_status_error, extensions::*, map::models::InfoWindowResponse};

/// Carga Info Window Handler
///
/// What the info window shows when one endpoint marker of a carga is
/// selected.
#[endpoint(
    tags("map"),
    summary = "Carga Info Window",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Info window"),
        (status_code = StatusCode::NOT_FOUND, description = "No marker for that endpoint"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown endpoint"),
    ),
)]
pub(crate) async fn handler(
    carga: PathParam<Uuid>,
    endpoint: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<InfoWindowResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let endpoint = endpoint
        .into_inner()
        .parse::<EndpointKind>()
        .or_400("invalid endpoint")?;

    let carga = state
        .app
        .cargas
        .get_carga(carga.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let postings = [carga];
    let mut view = MapView::new(&postings);

    let window = postings
        .first()
        .and_then(|carga| view.find(carga.uuid, endpoint))
        .and_then(|key| view.select(key))
        .ok_or_else(|| StatusError::not_found().brief("Endpoint has no coordinates"))?;

    Ok(Json(window.into()))
}
