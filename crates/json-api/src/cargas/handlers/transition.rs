//! Carga Lifecycle Handlers
//!
//! Owner-only state changes. The allowed transitions are enforced by the
//! service; a disallowed one answers 409.

use freight_app::domain::{
    cargas::{CargasServiceError, records::CargaRecord},
    profiles::records::UserUuid,
};
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cargas::{CargaResponse, errors::into_status_error},
    extensions::*,
};

/// Assign Carga Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssignCargaRequest {
    /// Carrier taking the load
    pub assignee_uuid: Uuid,
}

fn respond(
    result: Result<CargaRecord, CargasServiceError>,
) -> Result<Json<CargaResponse>, StatusError> {
    result
        .map(|carga| Json(carga.into()))
        .map_err(into_status_error)
}

/// Assign Carga Handler
#[endpoint(
    tags("cargas"),
    summary = "Assign Carga",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Carga assigned"),
        (status_code = StatusCode::NOT_FOUND, description = "Carga not found"),
        (status_code = StatusCode::CONFLICT, description = "Carga is not available"),
    ),
)]
#[tracing::instrument(
    name = "cargas.assign",
    skip(carga, json, depot),
    fields(
        carga_uuid = tracing::field::Empty,
        assignee_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn assign(
    carga: PathParam<Uuid>,
    json: JsonBody<AssignCargaRequest>,
    depot: &mut Depot,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;
    let carga = carga.into_inner();
    let assignee = UserUuid::from_uuid(json.into_inner().assignee_uuid);

    let span = tracing::Span::current();

    span.record("carga_uuid", tracing::field::display(carga));
    span.record("assignee_uuid", tracing::field::display(assignee));

    let assigned = respond(
        state
            .app
            .cargas
            .assign_carga(owner, carga.into(), assignee)
            .await,
    )?;

    tracing::info!("assigned carga");

    Ok(assigned)
}

/// Unassign Carga Handler
///
/// Puts an assigned carga back on offer.
#[endpoint(
    tags("cargas"),
    summary = "Unassign Carga",
    security(("bearer_auth" = []))
)]
pub(crate) async fn unassign(
    carga: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;

    respond(
        state
            .app
            .cargas
            .unassign_carga(owner, carga.into_inner().into())
            .await,
    )
}

/// Complete Carga Handler
#[endpoint(
    tags("cargas"),
    summary = "Complete Carga",
    security(("bearer_auth" = []))
)]
pub(crate) async fn complete(
    carga: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;

    respond(
        state
            .app
            .cargas
            .complete_carga(owner, carga.into_inner().into())
            .await,
    )
}

/// Cancel Carga Handler
#[endpoint(
    tags("cargas"),
    summary = "Cancel Carga",
    security(("bearer_auth" = []))
)]
pub(crate) async fn cancel(
    carga: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CargaResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;

    respond(
        state
            .app
            .cargas
            .cancel_carga(owner, carga.into_inner().into())
            .await,
    )
}
