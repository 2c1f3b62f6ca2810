//! Profiles Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::profiles::{
    data::NewProfile,
    records::{ProfileRecord, UserUuid},
};

const CREATE_PROFILE_SQL: &str = include_str!("sql/create_profile.sql");
const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");

/// PostgreSQL-backed profiles repository.
#[derive(Debug, Clone)]
pub(crate) struct PgProfilesRepository {
    pool: PgPool,
}

impl PgProfilesRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_profile(
        &self,
        profile: NewProfile,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(CREATE_PROFILE_SQL)
            .bind(profile.uuid.into_uuid())
            .bind(profile.display_name)
            .bind(profile.role.as_str())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_profile(&self, user: UserUuid) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role = row
            .try_get::<String, _>("role")?
            .parse()
            .map_err(|source| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(source),
            })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            display_name: row.try_get("display_name")?,
            role,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
