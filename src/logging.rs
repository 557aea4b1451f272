//! Tracing subscriber set-up for the command-line tool.
//!
//! Logs always go to stderr so that data printed on stdout can be piped.

use crate::config::{LogFormat, LoggingConfig};
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the filter: `RUST_LOG` wins, then `override_level`, then the
/// configured level.
pub fn build_filter(config: &LoggingConfig, override_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = override_level.unwrap_or(&config.level);
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(
    config: &LoggingConfig,
    override_level: Option<&str>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let layer = match config.format {
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config, override_level))
        .with(layer)
        .try_init()
}
