//! Truck Lifecycle Handlers

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    trucks::{TruckResponse, errors::into_status_error},
};

/// Cancel Truck Handler
#[endpoint(
    tags("trucks"),
    summary = "Cancel Truck",
    security(("bearer_auth" = []))
)]
pub(crate) async fn cancel(
    truck: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TruckResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;

    let truck = state
        .app
        .trucks
        .cancel_truck(owner, truck.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(truck.into()))
}

/// Complete Truck Handler
///
/// Marks the trip done; the truck leaves the listing.
#[endpoint(
    tags("trucks"),
    summary = "Complete Truck",
    security(("bearer_auth" = []))
)]
pub(crate) async fn complete(
    truck: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<TruckResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let owner = depot.user_uuid_or_401()?;

    let truck = state
        .app
        .trucks
        .complete_truck(owner, truck.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(truck.into()))
}

#[cfg(test)]
mod tests {
    use freight::postings::{PostingError, PostingState};
    use freight_app::domain::trucks::{TrucksServiceError, records::TruckUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_USER_UUID, make_truck};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(
            Router::with_path("trucks/{truck}")
                .push(Router::with_path("cancel").post(cancel))
                .push(Router::with_path("complete").post(complete)),
        )
    }

    #[tokio::test]
    async fn complete_returns_the_completed_truck() -> TestResult {
        let uuid = TruckUuid::new();

        let mut truck = make_truck(uuid)?;
        truck.state = PostingState::Completed;

        let mut mocks = Mocks::default();

        mocks
            .trucks
            .expect_complete_truck()
            .once()
            .withf(move |owner, requested| *owner == TEST_USER_UUID && *requested == uuid)
            .return_once(move |_, _| Ok(truck));

        let response: TruckResponse =
            TestClient::post(format!("http://example.com/trucks/{uuid}/complete"))
                .send(&make_service(mocks))
                .await
                .take_json()
                .await?;

        assert_eq!(response.state, "completed");

        Ok(())
    }

    #[tokio::test]
    async fn cancelling_twice_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .trucks
            .expect_cancel_truck()
            .once()
            .return_once(|_, _| {
                Err(TrucksServiceError::Transition(
                    PostingError::InvalidTransition {
                        from: PostingState::Cancelled,
                        to: PostingState::Cancelled,
                    },
                ))
            });

        let res = TestClient::post(format!(
            "http://example.com/trucks/{}/cancel",
            TruckUuid::new()
        ))
        .send(&make_service(mocks))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
