//! Alerts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        alerts::{
            data::NewAlert,
            errors::AlertsServiceError,
            records::{AlertRecord, AlertUuid},
            repository::PgAlertsRepository,
        },
        cargas::records::CargaRecord,
        profiles::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAlertsService {
    db: Db,
    repository: PgAlertsRepository,
}

impl PgAlertsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAlertsRepository::new(),
        }
    }
}

#[async_trait]
impl AlertsService for PgAlertsService {
    async fn create_alert(
        &self,
        user: UserUuid,
        alert: NewAlert,
    ) -> Result<AlertRecord, AlertsServiceError> {
        if alert.filter.is_empty() {
            return Err(AlertsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        let created = self.repository.create_alert(&mut tx, user, alert).await?;

        tx.commit().await?;

        info!(alert = %created.uuid, %user, "alert created");

        Ok(created)
    }

    async fn list_alerts(&self, user: UserUuid) -> Result<Vec<AlertRecord>, AlertsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let alerts = self.repository.list_alerts(&mut tx, user).await?;

        tx.commit().await?;

        Ok(alerts)
    }

    async fn delete_alert(&self, user: UserUuid, alert: AlertUuid) -> Result<(), AlertsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let rows_affected = self.repository.delete_alert(&mut tx, user, alert).await?;

        if rows_affected == 0 {
            return Err(AlertsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn matching_alerts(
        &self,
        carga: &CargaRecord,
    ) -> Result<Vec<AlertRecord>, AlertsServiceError> {
        let mut tx = self.db.begin().await?;

        let candidates = self
            .repository
            .matching_candidates(&mut tx, carga.owner_uuid)
            .await?;

        tx.commit().await?;

        let total = candidates.len();

        let matching: Vec<AlertRecord> = candidates
            .into_iter()
            .filter(|alert| {
                alert.filter.matches(
                    carga.origin.province.as_deref(),
                    carga.destination.province.as_deref(),
                    &carga.truck_type,
                )
            })
            .collect();

        debug!(carga = %carga.uuid, candidates = total, matching = matching.len(), "matched alerts");

        Ok(matching)
    }
}

#[automock]
#[async_trait]
pub trait AlertsService: Send + Sync {
    /// Saves an alert for `user`. An alert must narrow at least one field.
    async fn create_alert(
        &self,
        user: UserUuid,
        alert: NewAlert,
    ) -> Result<AlertRecord, AlertsServiceError>;

    /// The user's own alerts.
    async fn list_alerts(&self, user: UserUuid) -> Result<Vec<AlertRecord>, AlertsServiceError>;

    /// Deletes one of the user's alerts.
    async fn delete_alert(&self, user: UserUuid, alert: AlertUuid) -> Result<(), AlertsServiceError>;

    /// Active alerts of other users whose filter matches `carga`.
    async fn matching_alerts(
        &self,
        carga: &CargaRecord,
    ) -> Result<Vec<AlertRecord>, AlertsServiceError>;
}
