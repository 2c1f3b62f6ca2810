//! Settings Data

/// Category of the visibility grace periods.
pub const VISIBILITY_CATEGORY: &str = "visibility";

/// Category of map provider settings.
pub const MAPS_CATEGORY: &str = "maps";

/// Key of the map provider credential.
pub const MAPS_API_KEY: &str = "google_maps_api_key";

/// Value written by an upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariable {
    pub key: String,
    pub value: String,
    pub category: String,
    pub active: bool,
}
