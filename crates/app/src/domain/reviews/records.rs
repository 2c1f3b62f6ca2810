//! Review Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{cargas::records::CargaUuid, profiles::records::UserUuid},
    uuids::TypedUuid,
};

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// Review Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub reviewer_uuid: UserUuid,
    pub reviewed_uuid: UserUuid,
    pub carga_uuid: Option<CargaUuid>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Aggregate rating of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingSummary {
    pub count: u64,

    /// Mean rating to two decimals; `None` without reviews.
    pub average: Option<Decimal>,
}
