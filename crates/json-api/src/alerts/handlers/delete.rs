//! Delete Alert Handler

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{alerts::errors::into_status_error, extensions::*};

/// Delete Alert Handler
#[endpoint(
    tags("alerts"),
    summary = "Delete Alert",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Alert deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Alert not found"),
    ),
)]
#[tracing::instrument(
    name = "alerts.delete",
    skip(alert, depot),
    fields(alert_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    alert: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;
    let alert = alert.into_inner();

    tracing::Span::current().record("alert_uuid", tracing::field::display(alert));

    state
        .app
        .alerts
        .delete_alert(user, alert.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!("deleted alert");

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use freight_app::domain::alerts::{AlertsServiceError, records::AlertUuid};
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("alerts/{alert}").delete(handler))
    }

    #[tokio::test]
    async fn deletes_the_callers_alert() -> TestResult {
        let uuid = AlertUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .alerts
            .expect_delete_alert()
            .once()
            .withf(move |user, alert| *user == TEST_USER_UUID && *alert == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/alerts/{uuid}"))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn someone_elses_alert_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .alerts
            .expect_delete_alert()
            .once()
            .return_once(|_, _| Err(AlertsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/alerts/{}", AlertUuid::new()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
