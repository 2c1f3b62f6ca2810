//! Close Map Feed Handler

use salvo::prelude::*;

use crate::extensions::*;

/// Close Map Feed Handler
///
/// Tears down the caller's map feed. Refreshes still in flight are
/// discarded; the next map request opens a fresh feed.
#[endpoint(
    tags("map"),
    summary = "Close Map Feed",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Feed closed"),
        (status_code = StatusCode::NOT_FOUND, description = "No open feed"),
    ),
)]
#[tracing::instrument(
    name = "map.feed.close",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    if !state.app.feeds.close(user) {
        return Err(StatusError::not_found().brief("No open map feed"));
    }

    tracing::info!("closed map feed");

    Ok(StatusCode::NO_CONTENT)
}
