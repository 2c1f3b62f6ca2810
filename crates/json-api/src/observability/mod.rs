//! Log subscriber, request logging and Prometheus metrics.

use thiserror::Error;

use crate::config::observability::LoggingConfig;

mod logging;
mod metrics;
mod request;

pub(crate) use metrics::{metrics_handler, observe_degraded};
pub(crate) use request::RequestLogging;

#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global log subscriber.
pub(crate) fn init(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    logging::install(config)
}
