//! Alert Index Handler

use salvo::prelude::*;

use crate::{
    alerts::{errors::into_status_error, models::AlertResponse},
    extensions::*,
};

/// Alert Index Handler
///
/// The caller's own alerts.
#[endpoint(
    tags("alerts"),
    summary = "List Alerts",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<AlertResponse>>, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;

    let alerts = state
        .app
        .alerts
        .list_alerts(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(alerts.into_iter().map(Into::into).collect()))
}
