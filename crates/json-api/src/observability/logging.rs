//! Log subscriber.

use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::observability::{LogFormat, LoggingConfig};

use super::ObservabilityError;

/// Chatty dependencies kept at `warn` unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: [&str; 4] = ["h2", "hyper", "sqlx", "reqwest"];

pub(super) fn install(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_unset| EnvFilter::new(directives(&config.log_level)));

    match config.log_format {
        LogFormat::Compact => install_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_line_number(true),
        ),
        LogFormat::Json => install_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false),
        ),
    }
}

fn directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];

    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));

    directives.join(",")
}

fn install_layer<L>(filter: EnvFilter, layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(())
}
