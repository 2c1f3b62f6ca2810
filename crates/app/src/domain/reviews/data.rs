//! Review Data

use crate::domain::{
    cargas::records::CargaUuid, profiles::records::UserUuid, reviews::records::ReviewUuid,
};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// New Review Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub reviewed_uuid: UserUuid,

    /// The job the review is about, if any.
    pub carga_uuid: Option<CargaUuid>,
    pub rating: u8,
    pub comment: Option<String>,
}
