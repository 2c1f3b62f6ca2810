//! Test Helpers

use freight::postings::{Availability, Location, OperatingRadius};
use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, query};

use crate::domain::{
    cargas::{data::NewCarga, records::CargaUuid},
    profiles::records::UserUuid,
    trucks::{data::NewTruck, records::TruckUuid},
};

fn location(address: &str, province: &str) -> Location {
    Location {
        address: address.to_string(),
        province: Some(province.to_string()),
        city: None,
        coordinates: None,
    }
}

/// An open-ended carga between two provinces.
pub(crate) fn new_carga(origin: &str, destination: &str, truck_type: &str) -> NewCarga {
    NewCarga {
        uuid: CargaUuid::new(),
        origin: location(&format!("Acopio, {origin}"), origin),
        destination: location(&format!("Puerto, {destination}"), destination),
        cargo_type: "granos".to_string(),
        truck_type: truck_type.to_string(),
        rate: None,
        available_until: None,
    }
}

/// A permanently available truck without a preferred destination.
pub(crate) fn new_truck(origin: &str, truck_type: &str) -> NewTruck {
    NewTruck {
        uuid: TruckUuid::new(),
        origin: location(&format!("Base, {origin}"), origin),
        destination: None,
        truck_type: truck_type.to_string(),
        capacity_tons: Decimal::from(28),
        refrigerated: false,
        radius: OperatingRadius::new(200).expect("valid radius"),
        availability: Availability::Permanent,
    }
}

/// Insert a truck with only `available_from` set, a row shape the API never
/// writes but the schema allows. `pool` must bypass row-level security.
pub(crate) async fn insert_truck_from_only(
    pool: &PgPool,
    owner: UserUuid,
    from: Date,
) -> TruckUuid {
    let uuid = TruckUuid::new();

    query(
        "INSERT INTO trucks (uuid, owner_uuid, origin_address, origin_province, \
           truck_type, capacity_tons, available_from) \
         VALUES ($1, $2, 'Base, Córdoba', 'Córdoba', 'semi', 28, $3)",
    )
    .bind(uuid.into_uuid())
    .bind(owner.into_uuid())
    .bind(SqlxDate::from(from))
    .execute(pool)
    .await
    .expect("Failed to insert start-only truck");

    uuid
}
