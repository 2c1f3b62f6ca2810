//! Server configuration module

use std::net::SocketAddr;

use clap::Parser;

use crate::config::{
    marketplace::MarketplaceConfig, observability::LoggingConfig, server::ServerRuntimeConfig,
};

pub(crate) mod marketplace;
pub(crate) mod observability;
pub(crate) mod server;

/// Freight JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "freight-json", about = "Freight JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Listener and database.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Log output and request logging.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Geocoding, query monitor and visibility settings.
    #[command(flatten)]
    pub marketplace: MarketplaceConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Address to bind the listener to
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        self.server.socket_addr()
    }
}
