//! Alert Models

use freight_app::domain::alerts::records::AlertRecord;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Alert Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AlertResponse {
    pub uuid: Uuid,
    pub origin_province: Option<String>,
    pub destination_province: Option<String>,
    pub truck_type: Option<String>,
    pub active: bool,
    pub created_at: String,
}

impl From<AlertRecord> for AlertResponse {
    fn from(alert: AlertRecord) -> Self {
        Self {
            uuid: alert.uuid.into_uuid(),
            origin_province: alert.filter.origin_province,
            destination_province: alert.filter.destination_province,
            truck_type: alert.filter.truck_type,
            active: alert.active,
            created_at: alert.created_at.to_string(),
        }
    }
}
