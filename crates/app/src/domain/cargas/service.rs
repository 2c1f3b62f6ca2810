//! Cargas service.

use async_trait::async_trait;
use freight::{filters::PostingFilter, postings::PostingState};
use jiff::civil::Date;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        cargas::{
            data::NewCarga,
            errors::CargasServiceError,
            records::{CargaRecord, CargaUuid},
            repository::PgCargasRepository,
        },
        profiles::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCargasService {
    db: Db,
    repository: PgCargasRepository,
}

impl PgCargasService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCargasRepository::new(),
        }
    }

    /// Lock the owner's carga, check the lifecycle move and persist it.
    async fn transition(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
        next: PostingState,
        assignee: impl FnOnce(&CargaRecord) -> Option<UserUuid> + Send,
    ) -> Result<CargaRecord, CargasServiceError> {
        let mut tx = self.db.begin_user_transaction(owner).await?;

        let current = self
            .repository
            .lock_owned_carga(&mut tx, owner, carga)
            .await?;

        current
            .state
            .transition(next)
            .map_err(CargasServiceError::Transition)?;

        let assignee = assignee(&current);

        let updated = self
            .repository
            .update_state(&mut tx, owner, carga, next, assignee)
            .await?;

        tx.commit().await?;

        info!(%carga, from = %current.state, to = %next, "carga transitioned");

        Ok(updated)
    }
}

fn validate(carga: &NewCarga) -> Result<(), CargasServiceError> {
    let blank = [
        carga.cargo_type.as_str(),
        carga.truck_type.as_str(),
        carga.origin.address.as_str(),
        carga.destination.address.as_str(),
    ]
    .iter()
    .any(|value| value.trim().is_empty());

    if blank {
        return Err(CargasServiceError::InvalidData);
    }

    Ok(())
}

#[async_trait]
impl CargasService for PgCargasService {
    async fn list_available_cargas(
        &self,
        filter: PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<CargaRecord>, CargasServiceError> {
        let mut tx = self.db.begin().await?;

        let cargas = self
            .repository
            .list_available(&mut tx, &filter.normalised(), cutoff)
            .await?;

        tx.commit().await?;

        debug!(rows = cargas.len(), ?cutoff, "listed available cargas");

        Ok(cargas)
    }

    async fn get_carga(&self, carga: CargaUuid) -> Result<CargaRecord, CargasServiceError> {
        let mut tx = self.db.begin().await?;

        let carga = self.repository.get_carga(&mut tx, carga).await?;

        tx.commit().await?;

        Ok(carga)
    }

    async fn create_carga(
        &self,
        owner: UserUuid,
        carga: NewCarga,
    ) -> Result<CargaRecord, CargasServiceError> {
        validate(&carga)?;

        let mut tx = self.db.begin_user_transaction(owner).await?;

        let created = self.repository.create_carga(&mut tx, owner, carga).await?;

        tx.commit().await?;

        info!(carga = %created.uuid, %owner, "carga created");

        Ok(created)
    }

    async fn assign_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
        assignee: UserUuid,
    ) -> Result<CargaRecord, CargasServiceError> {
        if assignee == owner {
            return Err(CargasServiceError::InvalidData);
        }

        self.transition(owner, carga, PostingState::Assigned, |_| Some(assignee))
            .await
    }

    async fn unassign_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError> {
        self.transition(owner, carga, PostingState::Available, |_| None)
            .await
    }

    async fn complete_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError> {
        self.transition(owner, carga, PostingState::Completed, |current| {
            current.assignee_uuid
        })
        .await
    }

    async fn cancel_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError> {
        self.transition(owner, carga, PostingState::Cancelled, |current| {
            current.assignee_uuid
        })
        .await
    }
}

#[automock]
#[async_trait]
pub trait CargasService: Send + Sync {
    /// Available cargas matching `filter`, hiding those whose
    /// `available_until` precedes `cutoff` when one is given.
    async fn list_available_cargas(
        &self,
        filter: PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<CargaRecord>, CargasServiceError>;

    /// Retrieve a single carga in any state.
    async fn get_carga(&self, carga: CargaUuid) -> Result<CargaRecord, CargasServiceError>;

    /// Post a new carga owned by `owner`.
    async fn create_carga(
        &self,
        owner: UserUuid,
        carga: NewCarga,
    ) -> Result<CargaRecord, CargasServiceError>;

    /// Hand an available carga to a carrier.
    async fn assign_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
        assignee: UserUuid,
    ) -> Result<CargaRecord, CargasServiceError>;

    /// Put an assigned carga back on offer.
    async fn unassign_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError>;

    /// Mark an assigned carga delivered.
    async fn complete_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError>;

    /// Withdraw a carga.
    async fn cancel_carga(
        &self,
        owner: UserUuid,
        carga: CargaUuid,
    ) -> Result<CargaRecord, CargasServiceError>;
}
