//! Carga Models

use freight_app::domain::cargas::records::CargaRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payloads::{LocationPayload, RateResponse};

/// Carga Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CargaResponse {
    pub uuid: Uuid,
    pub owner_uuid: Uuid,
    pub origin: LocationPayload,
    pub destination: LocationPayload,
    pub cargo_type: String,
    pub truck_type: String,
    pub rate: Option<RateResponse>,

    /// `available`, `assigned`, `completed` or `cancelled`
    pub state: String,

    /// Last day the load is offered
    pub available_until: Option<String>,
    pub assignee_uuid: Option<Uuid>,
    pub assigned_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CargaRecord> for CargaResponse {
    fn from(carga: CargaRecord) -> Self {
        Self {
            uuid: carga.uuid.into_uuid(),
            owner_uuid: carga.owner_uuid.into_uuid(),
            origin: carga.origin.into(),
            destination: carga.destination.into(),
            cargo_type: carga.cargo_type,
            truck_type: carga.truck_type,
            rate: carga.rate.map(Into::into),
            state: carga.state.as_str().to_string(),
            available_until: carga.available_until.map(|date| date.to_string()),
            assignee_uuid: carga.assignee_uuid.map(|uuid| uuid.into_uuid()),
            assigned_at: carga.assigned_at.map(|at| at.to_string()),
            created_at: carga.created_at.to_string(),
            updated_at: carga.updated_at.to_string(),
        }
    }
}
