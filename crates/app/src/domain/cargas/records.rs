//! Carga Records

use freight::{
    map::Mappable,
    postings::{EndpointKind, Location, PostingState},
    rates::Rate,
};
use jiff::{Timestamp, civil::Date};

use crate::{domain::profiles::records::UserUuid, uuids::TypedUuid};

/// Carga UUID
pub type CargaUuid = TypedUuid<CargaRecord>;

/// Carga Record
#[derive(Debug, Clone, PartialEq)]
pub struct CargaRecord {
    pub uuid: CargaUuid,
    pub owner_uuid: UserUuid,
    pub origin: Location,
    pub destination: Location,
    pub cargo_type: String,
    pub truck_type: String,
    pub rate: Option<Rate>,
    pub state: PostingState,
    pub available_until: Option<Date>,
    pub assignee_uuid: Option<UserUuid>,
    pub assigned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Mappable for CargaRecord {
    type Id = CargaUuid;

    fn id(&self) -> CargaUuid {
        self.uuid
    }

    fn endpoint(&self, kind: EndpointKind) -> Option<&Location> {
        match kind {
            EndpointKind::Origin => Some(&self.origin),
            EndpointKind::Destination => Some(&self.destination),
        }
    }

    fn rate(&self) -> Option<Rate> {
        self.rate
    }
}
