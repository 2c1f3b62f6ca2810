//! Shared application domain and persistence modules.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod fixtures;
pub mod geocoding;
pub mod query;

#[cfg(test)]
mod test;

pub mod uuids;
