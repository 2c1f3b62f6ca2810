//! Freight Domain Concerns

pub mod alerts;
pub mod cargas;
pub(crate) mod columns;
pub mod profiles;
pub mod reviews;
pub mod settings;
pub mod trucks;
