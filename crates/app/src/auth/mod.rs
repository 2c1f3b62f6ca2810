//! Authentication
//!
//! Bearer sessions: the token is handed out once, only its SHA-256 is stored.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
