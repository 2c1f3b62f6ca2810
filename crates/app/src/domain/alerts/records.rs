//! Alert Records

use freight::filters::PostingFilter;
use jiff::Timestamp;

use crate::{domain::profiles::records::UserUuid, uuids::TypedUuid};

/// Alert UUID
pub type AlertUuid = TypedUuid<AlertRecord>;

/// Saved search that notifies its owner about new cargas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRecord {
    pub uuid: AlertUuid,
    pub user_uuid: UserUuid,
    pub filter: PostingFilter,
    pub active: bool,
    pub created_at: Timestamp,
}
