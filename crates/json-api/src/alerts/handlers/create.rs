//! Create Alert Handler

use freight::filters::PostingFilter;
use freight_app::domain::alerts::{data::NewAlert, records::AlertUuid};
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    alerts::{errors::into_status_error, models::AlertResponse},
    extensions::*,
};

/// Create Alert Request
///
/// Same fields as the browsing filter; at least one must be given.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAlertRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default)]
    pub origin_province: Option<String>,
    #[serde(default)]
    pub destination_province: Option<String>,
    #[serde(default)]
    pub truck_type: Option<String>,
}

impl From<CreateAlertRequest> for NewAlert {
    fn from(request: CreateAlertRequest) -> Self {
        NewAlert {
            uuid: request.uuid.map_or_else(AlertUuid::new, AlertUuid::from_uuid),
            filter: PostingFilter::new(
                request.origin_province,
                request.destination_province,
                request.truck_type,
            ),
        }
    }
}

/// Create Alert Handler
#[endpoint(
    tags("alerts"),
    summary = "Create Alert",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Alert created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty filter"),
        (status_code = StatusCode::CONFLICT, description = "Alert already exists"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAlertRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AlertResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let user = depot.user_uuid_or_401()?;
    let alert: NewAlert = json.into_inner().into();

    if alert.filter.is_empty() {
        return Err(StatusError::bad_request().brief("An alert must narrow at least one field"));
    }

    let alert = state
        .app
        .alerts
        .create_alert(user, alert)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/alerts/{}", alert.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(alert.into()))
}

#[cfg(test)]
mod tests {
    use freight_app::domain::alerts::records::AlertRecord;
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("alerts").post(handler))
    }

    #[tokio::test]
    async fn creates_an_alert_for_the_caller() -> TestResult {
        let uuid = AlertUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .alerts
            .expect_create_alert()
            .once()
            .withf(move |user, alert| {
                *user == TEST_USER_UUID
                    && alert.uuid == uuid
                    && alert.filter.truck_type.as_deref() == Some("semi")
            })
            .return_once(move |user, alert| {
                Ok(AlertRecord {
                    uuid: alert.uuid,
                    user_uuid: user,
                    filter: alert.filter,
                    active: true,
                    created_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/alerts")
            .json(&json!({ "uuid": uuid.into_uuid(), "truck_type": "semi" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let response: AlertResponse = res.take_json().await?;

        assert_eq!(response.uuid, uuid.into_uuid());
        assert!(response.active);

        Ok(())
    }

    #[tokio::test]
    async fn blank_filter_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.alerts.expect_create_alert().never();

        let res = TestClient::post("http://example.com/alerts")
            .json(&json!({ "origin_province": "   " }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
