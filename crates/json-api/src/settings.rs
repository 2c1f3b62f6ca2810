//! Visibility Settings Handler

use freight::visibility::{EntityKind, VisibilityMode};
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::extensions::*;

/// How long expired postings stay visible, and where that is decided.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VisibilityResponse {
    /// `server` or `client`
    pub mode: String,
    pub cargas_grace_days: u32,
    pub trucks_grace_days: u32,
}

/// Visibility Settings Handler
///
/// Unreadable settings fall back to the default grace period.
#[endpoint(
    tags("settings"),
    summary = "Visibility Settings",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<VisibilityResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let query = &state.app.query;

    let mode = match query.mode() {
        VisibilityMode::Server => "server",
        VisibilityMode::Client => "client",
    };

    Ok(Json(VisibilityResponse {
        mode: mode.to_string(),
        cargas_grace_days: query.policy(EntityKind::Cargo).await.grace().as_days(),
        trucks_grace_days: query.policy(EntityKind::Truck).await.grace().as_days(),
    }))
}
