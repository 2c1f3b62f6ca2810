//! Get Carga Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    cargas::{CargaResponse, errors::into_status_error},
    extensions::*,
};

/// Get Carga Handler
///
/// Returns a carga in any state.
#[endpoint(
    tags("cargas"),
    summary = "Get Carga",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    carga: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let carga = state
        .app
        .cargas
        .get_carga(carga.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(carga.into()))
}
