//! Settings
//!
//! Runtime configuration kept in `system_variables`: visibility grace periods
//! and the map provider credential.

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::SettingsServiceError;
pub use service::*;
