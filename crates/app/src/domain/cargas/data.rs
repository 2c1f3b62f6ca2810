//! Carga Data

use freight::{postings::Location, rates::Rate};
use jiff::civil::Date;

use crate::domain::cargas::records::CargaUuid;

/// New Carga Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarga {
    /// UUID to assign to the posting.
    pub uuid: CargaUuid,

    /// Pick-up location.
    pub origin: Location,

    /// Drop-off location.
    pub destination: Location,

    /// What is being shipped.
    pub cargo_type: String,

    /// Truck type required to carry it.
    pub truck_type: String,

    /// Offered tariff, if any.
    pub rate: Option<Rate>,

    /// Last day the load is offered.
    pub available_until: Option<Date>,
}
