//! Create Review Handler

use freight_app::domain::{
    cargas::records::CargaUuid,
    profiles::records::UserUuid,
    reviews::{data::NewReview, records::ReviewUuid},
};
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    reviews::{ReviewResponse, errors::into_status_error},
};

/// Create Review Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,
    pub reviewed_uuid: Uuid,

    /// The job being reviewed, if any
    #[serde(default)]
    pub carga_uuid: Option<Uuid>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(request: CreateReviewRequest) -> Self {
        NewReview {
            uuid: request.uuid.map_or_else(ReviewUuid::new, ReviewUuid::from_uuid),
            reviewed_uuid: UserUuid::from_uuid(request.reviewed_uuid),
            carga_uuid: request.carga_uuid.map(CargaUuid::from_uuid),
            rating: request.rating,
            comment: request
                .comment
                .map(|comment| comment.trim().to_string())
                .filter(|comment| !comment.is_empty()),
        }
    }
}

/// Create Review Handler
#[endpoint(
    tags("reviews"),
    summary = "Create Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid rating or self-review"),
        (status_code = StatusCode::CONFLICT, description = "Job already reviewed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let reviewer = depot.user_uuid_or_401()?;

    let review = state
        .app
        .reviews
        .create_review(reviewer, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}
