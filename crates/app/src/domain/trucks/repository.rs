//! Trucks Repository

use freight::{
    filters::PostingFilter,
    postings::{Availability, OperatingRadius, PostingState},
};
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    columns::{self, LocationColumns},
    profiles::records::UserUuid,
    trucks::{
        data::NewTruck,
        records::{TruckRecord, TruckUuid},
    },
};

const LIST_AVAILABLE_TRUCKS_SQL: &str = include_str!("sql/list_available_trucks.sql");
const GET_TRUCK_SQL: &str = include_str!("sql/get_truck.sql");
const LOCK_OWNED_TRUCK_SQL: &str = include_str!("sql/lock_owned_truck.sql");
const CREATE_TRUCK_SQL: &str = include_str!("sql/create_truck.sql");
const UPDATE_TRUCK_STATE_SQL: &str = include_str!("sql/update_truck_state.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgTrucksRepository;

impl PgTrucksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<TruckRecord>, sqlx::Error> {
        query_as::<Postgres, TruckRecord>(LIST_AVAILABLE_TRUCKS_SQL)
            .bind(filter.origin_pattern())
            .bind(filter.destination_pattern())
            .bind(filter.truck_type())
            .bind(cutoff.map(SqlxDate::from))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_truck(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        truck: TruckUuid,
    ) -> Result<TruckRecord, sqlx::Error> {
        query_as::<Postgres, TruckRecord>(GET_TRUCK_SQL)
            .bind(truck.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_owned_truck(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        truck: TruckUuid,
    ) -> Result<TruckRecord, sqlx::Error> {
        query_as::<Postgres, TruckRecord>(LOCK_OWNED_TRUCK_SQL)
            .bind(truck.into_uuid())
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_truck(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        truck: NewTruck,
    ) -> Result<TruckRecord, sqlx::Error> {
        let origin = LocationColumns::from(Some(&truck.origin));
        let destination = LocationColumns::from(truck.destination.as_ref());
        let (available_from, available_to) = truck.availability.columns();

        let radius_km =
            i16::try_from(truck.radius.km()).map_err(|e| decode_error("radius_km", e))?;

        query_as::<Postgres, TruckRecord>(CREATE_TRUCK_SQL)
            .bind(truck.uuid.into_uuid())
            .bind(owner.into_uuid())
            .bind(origin.address)
            .bind(origin.province)
            .bind(origin.city)
            .bind(origin.lat)
            .bind(origin.lng)
            .bind(destination.address)
            .bind(destination.province)
            .bind(destination.city)
            .bind(destination.lat)
            .bind(destination.lng)
            .bind(truck.truck_type)
            .bind(truck.capacity_tons)
            .bind(truck.refrigerated)
            .bind(radius_km)
            .bind(available_from.map(SqlxDate::from))
            .bind(available_to.map(SqlxDate::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_state(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        truck: TruckUuid,
        state: PostingState,
    ) -> Result<TruckRecord, sqlx::Error> {
        query_as::<Postgres, TruckRecord>(UPDATE_TRUCK_STATE_SQL)
            .bind(truck.into_uuid())
            .bind(owner.into_uuid())
            .bind(state.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

fn decode_error(column: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for TruckRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let radius_km: i16 = row.try_get("radius_km")?;

        let radius = u16::try_from(radius_km)
            .map_err(|e| decode_error("radius_km", e))
            .and_then(|km| OperatingRadius::new(km).map_err(|e| decode_error("radius_km", e)))?;

        let availability = Availability::from_columns(
            columns::date(row, "available_from")?,
            columns::date(row, "available_to")?,
        )
        .map_err(|e| decode_error("available_to", e))?;

        Ok(Self {
            uuid: TruckUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            origin: columns::location(row, "origin")?,
            destination: columns::optional_location(row, "destination")?,
            truck_type: row.try_get("truck_type")?,
            capacity_tons: row.try_get("capacity_tons")?,
            refrigerated: row.try_get("refrigerated")?,
            radius,
            availability,
            state: columns::state(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
