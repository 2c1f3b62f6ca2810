//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::{
    cargas::records::CargaUuid,
    profiles::records::UserUuid,
    reviews::{
        data::NewReview,
        records::{RatingSummary, ReviewRecord, ReviewUuid},
    },
};

const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const RATING_SUMMARY_SQL: &str = include_str!("sql/rating_summary.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reviewer: UserUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(reviewer.into_uuid())
            .bind(review.reviewed_uuid.into_uuid())
            .bind(review.carga_uuid.map(CargaUuid::into_uuid))
            .bind(i16::from(review.rating))
            .bind(review.comment)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reviewed: UserUuid,
    ) -> Result<Vec<ReviewRecord>, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
            .bind(reviewed.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn rating_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reviewed: UserUuid,
    ) -> Result<RatingSummary, sqlx::Error> {
        let (count, average): (i64, Option<Decimal>) = query_as(RATING_SUMMARY_SQL)
            .bind(reviewed.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let count = u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })?;

        Ok(RatingSummary { count, average })
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating_i16: i16 = row.try_get("rating")?;

        let rating = u8::try_from(rating_i16).map_err(|e| sqlx::Error::ColumnDecode {
            index: "rating".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            reviewer_uuid: UserUuid::from_uuid(row.try_get("reviewer_uuid")?),
            reviewed_uuid: UserUuid::from_uuid(row.try_get("reviewed_uuid")?),
            carga_uuid: row
                .try_get::<Option<Uuid>, _>("carga_uuid")?
                .map(CargaUuid::from_uuid),
            rating,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
