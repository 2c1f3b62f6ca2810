//! Truck Data

use freight::postings::{Availability, Location, OperatingRadius};
use rust_decimal::Decimal;

use crate::domain::trucks::records::TruckUuid;

/// New Truck Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTruck {
    pub uuid: TruckUuid,
    pub origin: Location,
    pub destination: Option<Location>,
    pub truck_type: String,
    pub capacity_tons: Decimal,
    pub refrigerated: bool,
    pub radius: OperatingRadius,
    pub availability: Availability,
}
