//! Alert Errors

use salvo::http::StatusError;
use tracing::error;

use freight_app::domain::alerts::AlertsServiceError;

pub(crate) fn into_status_error(error: AlertsServiceError) -> StatusError {
    match error {
        AlertsServiceError::AlreadyExists => StatusError::conflict().brief("Alert already exists"),
        AlertsServiceError::NotFound => StatusError::not_found().brief("Alert not found"),
        AlertsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced user does not exist")
        }
        AlertsServiceError::InvalidData => {
            StatusError::bad_request().brief("An alert must narrow at least one field")
        }
        AlertsServiceError::Sql(source) => {
            error!("alert storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
