//! Review Handlers

pub(crate) mod create;
pub(crate) mod index;

use freight_app::domain::reviews::records::ReviewRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub reviewer_uuid: Uuid,
    pub reviewed_uuid: Uuid,
    pub carga_uuid: Option<Uuid>,

    /// 1 to 5
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        Self {
            uuid: review.uuid.into_uuid(),
            reviewer_uuid: review.reviewer_uuid.into_uuid(),
            reviewed_uuid: review.reviewed_uuid.into_uuid(),
            carga_uuid: review.carga_uuid.map(|uuid| uuid.into_uuid()),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_string(),
        }
    }
}
