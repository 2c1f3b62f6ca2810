//! Review Errors

use salvo::http::StatusError;
use tracing::error;

use freight_app::domain::reviews::ReviewsServiceError;

pub(crate) fn into_status_error(error: ReviewsServiceError) -> StatusError {
    match error {
        ReviewsServiceError::AlreadyExists => {
            StatusError::conflict().brief("This job was already reviewed")
        }
        ReviewsServiceError::NotFound => StatusError::not_found().brief("User not found"),
        ReviewsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Reviewed user or carga does not exist")
        }
        ReviewsServiceError::SelfReview => {
            StatusError::bad_request().brief("Users cannot review themselves")
        }
        ReviewsServiceError::InvalidData => {
            StatusError::bad_request().brief("Rating must be between 1 and 5")
        }
        ReviewsServiceError::Sql(source) => {
            error!("review storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
