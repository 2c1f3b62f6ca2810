//! Truck Models

use freight_app::domain::trucks::records::TruckRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payloads::{AvailabilityResponse, LocationPayload};

/// Truck Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct TruckResponse {
    pub uuid: Uuid,
    pub owner_uuid: Uuid,
    pub origin: LocationPayload,

    /// Preferred destination, if any
    pub destination: Option<LocationPayload>,
    pub truck_type: String,

    /// Tonnes, as a decimal string
    pub capacity_tons: String,
    pub refrigerated: bool,

    /// Operating radius in kilometres
    pub radius_km: u16,
    pub availability: AvailabilityResponse,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TruckRecord> for TruckResponse {
    fn from(truck: TruckRecord) -> Self {
        Self {
            uuid: truck.uuid.into_uuid(),
            owner_uuid: truck.owner_uuid.into_uuid(),
            origin: truck.origin.into(),
            destination: truck.destination.map(Into::into),
            truck_type: truck.truck_type,
            capacity_tons: truck.capacity_tons.to_string(),
            refrigerated: truck.refrigerated,
            radius_km: truck.radius.km(),
            availability: truck.availability.into(),
            state: truck.state.as_str().to_string(),
            created_at: truck.created_at.to_string(),
            updated_at: truck.updated_at.to_string(),
        }
    }
}
