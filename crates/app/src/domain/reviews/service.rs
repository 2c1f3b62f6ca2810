//! Reviews service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        profiles::records::UserUuid,
        reviews::{
            data::{MAX_RATING, MIN_RATING, NewReview},
            errors::ReviewsServiceError,
            records::{RatingSummary, ReviewRecord},
            repository::PgReviewsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    async fn create_review(
        &self,
        reviewer: UserUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError> {
        if reviewer == review.reviewed_uuid {
            return Err(ReviewsServiceError::SelfReview);
        }

        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Err(ReviewsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_user_transaction(reviewer).await?;

        let created = self
            .repository
            .create_review(&mut tx, reviewer, review)
            .await?;

        tx.commit().await?;

        info!(review = %created.uuid, %reviewer, reviewed = %created.reviewed_uuid, "review created");

        Ok(created)
    }

    async fn list_reviews(
        &self,
        reviewed: UserUuid,
    ) -> Result<Vec<ReviewRecord>, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let reviews = self.repository.list_reviews(&mut tx, reviewed).await?;

        tx.commit().await?;

        Ok(reviews)
    }

    async fn rating_summary(&self, reviewed: UserUuid) -> Result<RatingSummary, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let summary = self.repository.rating_summary(&mut tx, reviewed).await?;

        tx.commit().await?;

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Records `reviewer`'s rating of another user.
    async fn create_review(
        &self,
        reviewer: UserUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Reviews received by a user, newest first.
    async fn list_reviews(&self, reviewed: UserUuid)
    -> Result<Vec<ReviewRecord>, ReviewsServiceError>;

    /// Count and average of the ratings a user received.
    async fn rating_summary(&self, reviewed: UserUuid) -> Result<RatingSummary, ReviewsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{cargas::records::CargaUuid, reviews::records::ReviewUuid},
        test::{TestContext, helpers::new_carga},
    };

    use super::*;

    fn review(reviewed: UserUuid, carga: Option<CargaUuid>, rating: u8) -> NewReview {
        NewReview {
            uuid: ReviewUuid::new(),
            reviewed_uuid: reviewed,
            carga_uuid: carga,
            rating,
            comment: Some("Puntual y prolijo".to_string()),
        }
    }

    #[tokio::test]
    async fn summary_without_reviews_has_no_average() -> TestResult {
        let ctx = TestContext::new().await;

        let summary = ctx.reviews.rating_summary(ctx.carrier).await?;

        assert_eq!(summary, RatingSummary::default());

        Ok(())
    }

    #[tokio::test]
    async fn summary_averages_ratings() -> TestResult {
        let ctx = TestContext::new().await;

        for (origin, rating) in [("Santa Fe", 5), ("Córdoba", 4), ("Salta", 4)] {
            let carga = ctx
                .cargas
                .create_carga(ctx.shipper, new_carga(origin, "Buenos Aires", "semi"))
                .await?;

            ctx.reviews
                .create_review(ctx.shipper, review(ctx.carrier, Some(carga.uuid), rating))
                .await?;
        }

        let summary = ctx.reviews.rating_summary(ctx.carrier).await?;

        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(Decimal::new(433, 2)));
        assert_eq!(ctx.reviews.list_reviews(ctx.carrier).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn self_reviews_are_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .reviews
            .create_review(ctx.carrier, review(ctx.carrier, None, 5))
            .await;

        assert!(matches!(result, Err(ReviewsServiceError::SelfReview)));
    }

    #[tokio::test]
    async fn ratings_outside_one_to_five_are_rejected() {
        let ctx = TestContext::new().await;

        for rating in [0, 6] {
            let result = ctx
                .reviews
                .create_review(ctx.shipper, review(ctx.carrier, None, rating))
                .await;

            assert!(matches!(result, Err(ReviewsServiceError::InvalidData)));
        }
    }

    #[tokio::test]
    async fn one_review_per_job() -> TestResult {
        let ctx = TestContext::new().await;
        let carga = ctx
            .cargas
            .create_carga(ctx.shipper, new_carga("Santa Fe", "Córdoba", "semi"))
            .await?;

        ctx.reviews
            .create_review(ctx.shipper, review(ctx.carrier, Some(carga.uuid), 5))
            .await?;

        let result = ctx
            .reviews
            .create_review(ctx.shipper, review(ctx.carrier, Some(carga.uuid), 1))
            .await;

        assert!(matches!(result, Err(ReviewsServiceError::AlreadyExists)));

        Ok(())
    }
}
