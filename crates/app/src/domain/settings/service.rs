//! Settings service.

use async_trait::async_trait;
use freight::{
    map::MapCapability,
    visibility::{EntityKind, GracePeriod},
};
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;

use crate::domain::settings::{
    data::{MAPS_API_KEY, NewVariable},
    errors::SettingsServiceError,
    records::SystemVariableRecord,
    repository::PgSettingsRepository,
};

#[derive(Debug, Clone)]
pub struct PgSettingsService {
    repository: PgSettingsRepository,
}

impl PgSettingsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgSettingsRepository::new(pool),
        }
    }

    async fn active_value(&self, key: &str) -> Result<Option<String>, SettingsServiceError> {
        let variable = self.repository.get_variable(key).await?;

        Ok(variable
            .filter(|variable| variable.active)
            .map(|variable| variable.value))
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_variable(&self, key: &str) -> Result<SystemVariableRecord, SettingsServiceError> {
        self.repository
            .get_variable(key)
            .await?
            .ok_or(SettingsServiceError::NotFound)
    }

    async fn list_variables(
        &self,
        category: Option<String>,
    ) -> Result<Vec<SystemVariableRecord>, SettingsServiceError> {
        self.repository
            .list_variables(category.as_deref())
            .await
            .map_err(Into::into)
    }

    async fn set_variable(
        &self,
        variable: NewVariable,
    ) -> Result<SystemVariableRecord, SettingsServiceError> {
        if variable.key.trim().is_empty() || variable.category.trim().is_empty() {
            return Err(SettingsServiceError::InvalidData);
        }

        self.repository
            .set_variable(variable)
            .await
            .map_err(Into::into)
    }

    async fn grace_period(&self, kind: EntityKind) -> Result<GracePeriod, SettingsServiceError> {
        let Some(value) = self.active_value(kind.setting_key()).await? else {
            return Ok(GracePeriod::default());
        };

        Ok(value.parse().unwrap_or_else(|error| {
            warn!(key = kind.setting_key(), %error, "ignoring unparsable grace period");

            GracePeriod::default()
        }))
    }

    async fn map_capability(&self) -> Result<MapCapability, SettingsServiceError> {
        let key = self.active_value(MAPS_API_KEY).await?;

        Ok(MapCapability::from_credential(key.as_deref()))
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Fetch one variable regardless of its active flag.
    async fn get_variable(&self, key: &str) -> Result<SystemVariableRecord, SettingsServiceError>;

    /// Variables, optionally restricted to one category.
    async fn list_variables(
        &self,
        category: Option<String>,
    ) -> Result<Vec<SystemVariableRecord>, SettingsServiceError>;

    /// Insert or overwrite a variable.
    async fn set_variable(
        &self,
        variable: NewVariable,
    ) -> Result<SystemVariableRecord, SettingsServiceError>;

    /// Grace period for `kind`. Absent, inactive and unparsable values yield
    /// the default; only storage failures are errors.
    async fn grace_period(&self, kind: EntityKind) -> Result<GracePeriod, SettingsServiceError>;

    /// What the client map can do with the stored credential.
    async fn map_capability(&self) -> Result<MapCapability, SettingsServiceError>;
}
