//! Alert Data

use freight::filters::PostingFilter;

use crate::domain::alerts::records::AlertUuid;

/// New Alert Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub uuid: AlertUuid,
    pub filter: PostingFilter,
}
