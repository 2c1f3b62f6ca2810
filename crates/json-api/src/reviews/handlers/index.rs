//! User Reviews Handler

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    reviews::{ReviewResponse, errors::into_status_error},
};

/// Reviews a user received, with their rating summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserReviewsResponse {
    pub count: u64,

    /// Mean rating to two decimals; absent without reviews
    pub average: Option<String>,
    pub reviews: Vec<ReviewResponse>,
}

/// User Reviews Handler
#[endpoint(
    tags("reviews"),
    summary = "List User Reviews",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserReviewsResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let reviewed = user.into_inner().into();

    let summary = state
        .app
        .reviews
        .rating_summary(reviewed)
        .await
        .map_err(into_status_error)?;

    let reviews = state
        .app
        .reviews
        .list_reviews(reviewed)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UserReviewsResponse {
        count: summary.count,
        average: summary.average.map(|average| average.to_string()),
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use freight_app::domain::{profiles::records::UserUuid, reviews::records::RatingSummary};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn user_without_reviews_has_no_average() -> TestResult {
        let user = UserUuid::new();

        let mut mocks = Mocks::default();

        mocks
            .reviews
            .expect_rating_summary()
            .once()
            .withf(move |reviewed| *reviewed == user)
            .return_once(|_| Ok(RatingSummary::default()));

        mocks
            .reviews
            .expect_list_reviews()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let response: UserReviewsResponse =
            TestClient::get(format!("http://example.com/users/{user}/reviews"))
                .send(&mocks.service(Router::with_path("users/{user}/reviews").get(handler)))
                .await
                .take_json()
                .await?;

        assert_eq!(response.count, 0);
        assert_eq!(response.average, None);
        assert!(response.reviews.is_empty());

        Ok(())
    }
}
