//! Carga Errors

use salvo::http::StatusError;
use tracing::error;

use freight_app::domain::cargas::CargasServiceError;

pub(crate) fn into_status_error(error: CargasServiceError) -> StatusError {
    match error {
        CargasServiceError::AlreadyExists => StatusError::conflict().brief("Carga already exists"),
        CargasServiceError::NotFound => StatusError::not_found().brief("Carga not found"),
        CargasServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced user does not exist")
        }
        CargasServiceError::MissingRequiredData | CargasServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid carga payload")
        }
        CargasServiceError::Transition(source) => StatusError::conflict().brief(source.to_string()),
        CargasServiceError::Sql(source) => {
            error!("carga storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use freight::postings::{PostingError, PostingState};
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn transitions_map_to_conflict() {
        let error = into_status_error(CargasServiceError::Transition(
            PostingError::InvalidTransition {
                from: PostingState::Cancelled,
                to: PostingState::Available,
            },
        ));

        assert_eq!(error.code, StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        for error in [
            CargasServiceError::InvalidData,
            CargasServiceError::MissingRequiredData,
            CargasServiceError::InvalidReference,
        ] {
            assert_eq!(into_status_error(error).code, StatusCode::BAD_REQUEST);
        }
    }
}
