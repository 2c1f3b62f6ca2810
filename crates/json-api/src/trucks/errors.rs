//! Truck Errors

use salvo::http::StatusError;
use tracing::error;

use freight_app::domain::trucks::TrucksServiceError;

pub(crate) fn into_status_error(error: TrucksServiceError) -> StatusError {
    match error {
        TrucksServiceError::AlreadyExists => StatusError::conflict().brief("Truck already exists"),
        TrucksServiceError::NotFound => StatusError::not_found().brief("Truck not found"),
        TrucksServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced user does not exist")
        }
        TrucksServiceError::MissingRequiredData | TrucksServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid truck payload")
        }
        TrucksServiceError::Transition(source) => StatusError::conflict().brief(source.to_string()),
        TrucksServiceError::Sql(source) => {
            error!("truck storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
