//! Carga Index Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    cargas::CargaResponse, extensions::*, observability::observe_degraded,
    payloads::posting_filter,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CargasResponse {
    /// Available, visible cargas
    pub cargas: Vec<CargaResponse>,

    /// The backend query failed and `cargas` is empty
    pub degraded: bool,

    /// Grace period applied, in days
    pub grace_days: u32,
}

/// Carga Index Handler
///
/// Lists available cargas, narrowed by province and truck type.
#[endpoint(
    tags("cargas"),
    summary = "List Cargas",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    origin: QueryParam<String, false>,
    destination: QueryParam<String, false>,
    truck_type: QueryParam<String, false>,
    today: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CargasResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let today = today.into_today()?;
    let filter = posting_filter(origin, destination, truck_type);

    let fetched = state.app.query.fetch_cargas(&filter, today).await;

    if fetched.degraded {
        observe_degraded("cargas");
    }

    Ok(Json(CargasResponse {
        cargas: fetched.rows.into_iter().map(Into::into).collect(),
        degraded: fetched.degraded,
        grace_days: fetched.grace.as_days(),
    }))
}

#[cfg(test)]
mod tests {
    use freight::{filters::PostingFilter, visibility::GracePeriod};
    use freight_app::domain::cargas::{CargasServiceError, records::CargaUuid};
    use jiff::{ToSpan, civil::date};
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_carga};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("cargas").get(handler))
    }

    fn with_grace(mocks: &mut Mocks, days: u32) {
        mocks
            .settings
            .expect_grace_period()
            .returning(move |_| Ok(GracePeriod::days(days)));
    }

    #[tokio::test]
    async fn lists_cargas_with_the_server_cutoff() -> TestResult {
        let uuid = CargaUuid::new();
        let carga = make_carga(uuid)?;
        let today = date(2026, 10, 19);
        let cutoff = today.checked_sub(15.days())?;

        let mut mocks = Mocks::default();

        with_grace(&mut mocks, 15);

        mocks
            .cargas
            .expect_list_available_cargas()
            .once()
            .with(
                eq(PostingFilter::new(
                    Some("santa".to_string()),
                    None,
                    Some("semi".to_string()),
                )),
                eq(Some(cutoff)),
            )
            .return_once(move |_, _| Ok(vec![carga]));

        let response: CargasResponse = TestClient::get(
            "http://example.com/cargas?origin=santa&destination=&truck_type=semi&today=2026-10-19",
        )
        .send(&make_service(mocks))
        .await
        .take_json()
        .await?;

        assert!(!response.degraded);
        assert_eq!(response.grace_days, 15);
        assert_eq!(response.cargas.len(), 1, "expected one carga");
        assert_eq!(
            response.cargas.first().map(|carga| carga.uuid),
            Some(uuid.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn backend_failure_is_a_degraded_200() -> TestResult {
        let mut mocks = Mocks::default();

        with_grace(&mut mocks, 30);

        mocks
            .cargas
            .expect_list_available_cargas()
            .once()
            .return_once(|_, _| Err(CargasServiceError::InvalidData));

        let mut res = TestClient::get("http://example.com/cargas")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let response: CargasResponse = res.take_json().await?;

        assert!(response.degraded);
        assert!(response.cargas.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unparsable_today_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/cargas?today=yesterday")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
