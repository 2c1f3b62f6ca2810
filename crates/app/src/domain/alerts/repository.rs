//! Alerts Repository

use freight::filters::PostingFilter;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    alerts::{
        data::NewAlert,
        records::{AlertRecord, AlertUuid},
    },
    profiles::records::UserUuid,
};

const CREATE_ALERT_SQL: &str = include_str!("sql/create_alert.sql");
const LIST_ALERTS_SQL: &str = include_str!("sql/list_alerts.sql");
const DELETE_ALERT_SQL: &str = include_str!("sql/delete_alert.sql");
const MATCHING_ALERT_CANDIDATES_SQL: &str = include_str!("sql/matching_alert_candidates.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAlertsRepository;

impl PgAlertsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_alert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        alert: NewAlert,
    ) -> Result<AlertRecord, sqlx::Error> {
        let filter = alert.filter.normalised();

        query_as::<Postgres, AlertRecord>(CREATE_ALERT_SQL)
            .bind(alert.uuid.into_uuid())
            .bind(user.into_uuid())
            .bind(filter.origin_province)
            .bind(filter.destination_province)
            .bind(filter.truck_type)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_alerts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<AlertRecord>, sqlx::Error> {
        query_as::<Postgres, AlertRecord>(LIST_ALERTS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_alert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        alert: AlertUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ALERT_SQL)
            .bind(alert.into_uuid())
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Active alerts of everyone except `owner`.
    pub(crate) async fn matching_candidates(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Vec<AlertRecord>, sqlx::Error> {
        query_as::<Postgres, AlertRecord>(MATCHING_ALERT_CANDIDATES_SQL)
            .bind(owner.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AlertRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AlertUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            filter: PostingFilter::new(
                row.try_get("origin_province")?,
                row.try_get("destination_province")?,
                row.try_get("truck_type")?,
            ),
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
