//! Log output setup for the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::settings::LoggingSettings;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// stays free for the RPC protocol. Calling this twice is a no-op.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let layer = if settings.json {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_ok() {
        tracing::info!(level = %settings.level, json = settings.json, "logging initialized");
    }
}
