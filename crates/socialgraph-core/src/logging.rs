//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        let layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true);
        registry.with(layer).try_init().is_ok()
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        registry.with(layer).try_init().is_ok()
    }
}
