//! Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::domain::settings::{data::NewVariable, records::SystemVariableRecord};

const GET_VARIABLE_SQL: &str = include_str!("sql/get_variable.sql");
const LIST_VARIABLES_SQL: &str = include_str!("sql/list_variables.sql");
const SET_VARIABLE_SQL: &str = include_str!("sql/set_variable.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get_variable(
        &self,
        key: &str,
    ) -> Result<Option<SystemVariableRecord>, sqlx::Error> {
        query_as::<Postgres, SystemVariableRecord>(GET_VARIABLE_SQL)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn list_variables(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<SystemVariableRecord>, sqlx::Error> {
        query_as::<Postgres, SystemVariableRecord>(LIST_VARIABLES_SQL)
            .bind(category)
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn set_variable(
        &self,
        variable: NewVariable,
    ) -> Result<SystemVariableRecord, sqlx::Error> {
        query_as::<Postgres, SystemVariableRecord>(SET_VARIABLE_SQL)
            .bind(variable.key)
            .bind(variable.value)
            .bind(variable.category)
            .bind(variable.active)
            .fetch_one(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SystemVariableRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            active: row.try_get("active")?,
            category: row.try_get("category")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
