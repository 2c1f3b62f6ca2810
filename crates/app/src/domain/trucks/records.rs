//! Truck Records

use freight::{
    map::Mappable,
    postings::{Availability, EndpointKind, Location, OperatingRadius, PostingState},
};
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{domain::profiles::records::UserUuid, uuids::TypedUuid};

/// Truck UUID
pub type TruckUuid = TypedUuid<TruckRecord>;

/// Truck availability posting.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckRecord {
    pub uuid: TruckUuid,
    pub owner_uuid: UserUuid,
    pub origin: Location,

    /// Preferred destination; trucks may be offered for any route.
    pub destination: Option<Location>,
    pub truck_type: String,
    pub capacity_tons: Decimal,
    pub refrigerated: bool,
    pub radius: OperatingRadius,
    pub availability: Availability,
    pub state: PostingState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Mappable for TruckRecord {
    type Id = TruckUuid;

    fn id(&self) -> TruckUuid {
        self.uuid
    }

    fn endpoint(&self, kind: EndpointKind) -> Option<&Location> {
        match kind {
            EndpointKind::Origin => Some(&self.origin),
            EndpointKind::Destination => self.destination.as_ref(),
        }
    }
}
