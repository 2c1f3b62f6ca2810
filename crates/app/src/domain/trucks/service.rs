//! Trucks service.

use async_trait::async_trait;
use freight::{filters::PostingFilter, postings::PostingState};
use jiff::civil::Date;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        profiles::records::UserUuid,
        trucks::{
            data::NewTruck,
            errors::TrucksServiceError,
            records::{TruckRecord, TruckUuid},
            repository::PgTrucksRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTrucksService {
    db: Db,
    repository: PgTrucksRepository,
}

impl PgTrucksService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTrucksRepository::new(),
        }
    }

    async fn transition(
        &self,
        owner: UserUuid,
        truck: TruckUuid,
        next: PostingState,
    ) -> Result<TruckRecord, TrucksServiceError> {
        let mut tx = self.db.begin_user_transaction(owner).await?;

        let current = self
            .repository
            .lock_owned_truck(&mut tx, owner, truck)
            .await?;

        current
            .state
            .truck_transition(next)
            .map_err(TrucksServiceError::Transition)?;

        let updated = self
            .repository
            .update_state(&mut tx, owner, truck, next)
            .await?;

        tx.commit().await?;

        info!(%truck, from = %current.state, to = %next, "truck transitioned");

        Ok(updated)
    }
}

#[async_trait]
impl TrucksService for PgTrucksService {
    async fn list_available_trucks(
        &self,
        filter: PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<TruckRecord>, TrucksServiceError> {
        let mut tx = self.db.begin().await?;

        let trucks = self
            .repository
            .list_available(&mut tx, &filter.normalised(), cutoff)
            .await?;

        tx.commit().await?;

        debug!(rows = trucks.len(), ?cutoff, "listed available trucks");

        Ok(trucks)
    }

    async fn get_truck(&self, truck: TruckUuid) -> Result<TruckRecord, TrucksServiceError> {
        let mut tx = self.db.begin().await?;

        let truck = self.repository.get_truck(&mut tx, truck).await?;

        tx.commit().await?;

        Ok(truck)
    }

    async fn create_truck(
        &self,
        owner: UserUuid,
        truck: NewTruck,
    ) -> Result<TruckRecord, TrucksServiceError> {
        if truck.truck_type.trim().is_empty()
            || truck.origin.address.trim().is_empty()
            || truck.capacity_tons <= Decimal::ZERO
        {
            return Err(TrucksServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(owner).await?;

        let created = self.repository.create_truck(&mut tx, owner, truck).await?;

        tx.commit().await?;

        info!(truck = %created.uuid, %owner, "truck created");

        Ok(created)
    }

    async fn cancel_truck(
        &self,
        owner: UserUuid,
        truck: TruckUuid,
    ) -> Result<TruckRecord, TrucksServiceError> {
        self.transition(owner, truck, PostingState::Cancelled).await
    }

    async fn complete_truck(
        &self,
        owner: UserUuid,
        truck: TruckUuid,
    ) -> Result<TruckRecord, TrucksServiceError> {
        self.transition(owner, truck, PostingState::Completed).await
    }
}

#[automock]
#[async_trait]
pub trait TrucksService: Send + Sync {
    /// Available trucks matching `filter`; with a `cutoff`, trucks whose
    /// availability ended before it are hidden.
    async fn list_available_trucks(
        &self,
        filter: PostingFilter,
        cutoff: Option<Date>,
    ) -> Result<Vec<TruckRecord>, TrucksServiceError>;

    /// Retrieve a single truck.
    async fn get_truck(&self, truck: TruckUuid) -> Result<TruckRecord, TrucksServiceError>;

    /// Post truck availability.
    async fn create_truck(
        &self,
        owner: UserUuid,
        truck: NewTruck,
    ) -> Result<TruckRecord, TrucksServiceError>;

    /// Withdraw the posting.
    async fn cancel_truck(
        &self,
        owner: UserUuid,
        truck: TruckUuid,
    ) -> Result<TruckRecord, TrucksServiceError>;

    /// Mark the truck as used.
    async fn complete_truck(
        &self,
        owner: UserUuid,
        truck: TruckUuid,
    ) -> Result<TruckRecord, TrucksServiceError>;
}
