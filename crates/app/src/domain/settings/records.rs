//! Settings Records

use jiff::Timestamp;

/// A `system_variables` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemVariableRecord {
    pub key: String,
    pub value: String,
    pub active: bool,
    pub category: String,
    pub updated_at: Timestamp,
}
