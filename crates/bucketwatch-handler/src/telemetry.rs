//! Subscriber setup for the binaries

use bucketwatch_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the process-wide subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "pretty" => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init(),
        // The log service stamps ingestion time itself
        _ => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
