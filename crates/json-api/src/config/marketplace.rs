//! Marketplace Config

use std::time::Duration;

use clap::{Args, ValueEnum};
use freight::visibility::VisibilityMode;
use freight_app::{
    context::AppOptions,
    geocoding::{DEFAULT_GEOCODING_BASE_URL, GeocodingConfig},
};

/// Where the grace-period cutoff is applied.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum VisibilityModeArg {
    /// Bind the cutoff into the SQL predicate.
    Server,

    /// Filter fetched rows in the API process.
    Client,
}

impl From<VisibilityModeArg> for VisibilityMode {
    fn from(mode: VisibilityModeArg) -> Self {
        match mode {
            VisibilityModeArg::Server => Self::Server,
            VisibilityModeArg::Client => Self::Client,
        }
    }
}

/// Geocoding, query monitor and visibility settings.
#[derive(Debug, Args)]
pub struct MarketplaceConfig {
    /// Geocoding provider scheme and host.
    #[arg(long, env = "GEOCODING_BASE_URL", default_value = DEFAULT_GEOCODING_BASE_URL)]
    pub geocoding_base_url: String,

    /// Server-side geocoding key; lookups fail without one.
    #[arg(long, env = "GEOCODING_API_KEY", hide_env_values = true)]
    pub geocoding_api_key: Option<String>,

    /// Geocoding request timeout in milliseconds.
    #[arg(long, env = "GEOCODING_TIMEOUT_MS", default_value_t = 5000)]
    pub geocoding_timeout_ms: u64,

    /// Number of query attempts kept by the monitor.
    #[arg(long, env = "QUERY_MONITOR_CAPACITY", default_value_t = 50)]
    pub query_monitor_capacity: usize,

    /// Where the visibility cutoff is applied (server, client).
    #[arg(long, env = "VISIBILITY_MODE", value_enum, default_value_t = VisibilityModeArg::Server)]
    pub visibility_mode: VisibilityModeArg,
}

impl MarketplaceConfig {
    /// Options for building the application context.
    #[must_use]
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            geocoding: GeocodingConfig {
                base_url: self.geocoding_base_url.clone(),
                api_key: self
                    .geocoding_api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty()),
                timeout: Duration::from_millis(self.geocoding_timeout_ms),
            },
            monitor_capacity: self.query_monitor_capacity,
            visibility_mode: self.visibility_mode.into(),
        }
    }
}
