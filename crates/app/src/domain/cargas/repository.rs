//! Cargas Repository

use freight::{filters::PostingFilter, postings::PostingState};
use jiff::civil::Date;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    cargas::{
        data::NewCarga,
        records::{CargaRecord, CargaUuid},
    },
    columns::{self, LocationColumns, RateColumns},
    profiles::records::UserUuid,
};

const LIST_AVAILABLE_CARGAS_SQL: &str = include_str!("sql/list_available_cargas.sql");
const GET_CARGA_SQL: &str = include_str!("sql/get_carga.sql");
const LOCK_OWNED_CARGA_SQL: &str = include_str!("sql/lock_owned_carga.sql");
const CREATE_CARGA_SQL: &str = include_str!("sql/create_carga.sql");
const UPDATE_CARGA_STATE_SQL: &str = include_str!("sql/update_carga_state.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCargasRepository;

impl PgCargasRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_available(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<CargaRecord>, sqlx::Error> {
        query_as::<Postgres, CargaRecord>(LIST_AVAILABLE_CARGAS_SQL)
            .bind(filter.origin_pattern())
            .bind(filter.destination_pattern())
            .bind(filter.truck_type())
            .bind(cutoff.map(SqlxDate::from))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_carga(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        carga: CargaUuid,
    ) -> Result<CargaRecord, sqlx::Error> {
        query_as::<Postgres, CargaRecord>(GET_CARGA_SQL)
            .bind(carga.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Row-locks a carga owned by `owner`; other owners see `RowNotFound`.
    pub(crate) async fn lock_owned_carga(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, sqlx::Error> {
        query_as::<Postgres, CargaRecord>(LOCK_OWNED_CARGA_SQL)
            .bind(carga.into_uuid())
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_carga(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        carga: NewCarga,
    ) -> Result<CargaRecord, sqlx::Error> {
        let origin = LocationColumns::from(Some(&carga.origin));
        let destination = LocationColumns::from(Some(&carga.destination));
        let rate = RateColumns::from(carga.rate);

        query_as::<Postgres, CargaRecord>(CREATE_CARGA_SQL)
            .bind(carga.uuid.into_uuid())
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
            .bind(carga.cargo_type)
            .bind(carga.truck_type)
            .bind(rate.amount)
            .bind(rate.kind)
            .bind(rate.approximate)
            .bind(carga.available_until.map(SqlxDate::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_state(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        carga: CargaUuid,
        state: PostingState,
        assignee: Option<UserUuid>,
    ) -> Result<CargaRecord, sqlx::Error> {
        query_as::<Postgres, CargaRecord>(UPDATE_CARGA_STATE_SQL)
            .bind(carga.into_uuid())
            .bind(owner.into_uuid())
            .bind(state.as_str())
            .bind(assignee.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CargaRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CargaUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            origin: columns::location(row, "origin")?,
            destination: columns::location(row, "destination")?,
            cargo_type: row.try_get("cargo_type")?,
            truck_type: row.try_get("truck_type")?,
            rate: columns::rate(row)?,
            state: columns::state(row)?,
            available_until: columns::date(row, "available_until")?,
            assignee_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("assignee_uuid")?
                .map(UserUuid::from_uuid),
            assigned_at: row
                .try_get::<Option<SqlxTimestamp>, _>("assigned_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
