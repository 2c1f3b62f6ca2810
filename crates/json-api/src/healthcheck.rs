//! Freight JSON API Healthcheck Handler

use freight::visibility::VisibilityMode;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::extensions::*;

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Where posting visibility is decided: `server` or `client`
    pub visibility_mode: String,

    /// Seconds since the process started serving
    pub uptime_secs: u64,
}

/// Healthcheck handler
///
/// Answers without touching the database.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let visibility_mode = match state.app.query.mode() {
        VisibilityMode::Server => "server",
        VisibilityMode::Client => "client",
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        visibility_mode: visibility_mode.to_string(),
        uptime_secs: state.started.elapsed().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn reports_ok_and_the_visibility_mode() -> TestResult {
        let service = Mocks {
            mode: VisibilityMode::Client,
            ..Mocks::default()
        }
        .service(Router::with_path("healthcheck").get(handler));

        let response: HealthResponse = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(response.status, "ok");
        assert_eq!(response.visibility_mode, "client");

        Ok(())
    }
}
