//! Logging and tracing bootstrap.

use tracing_subscriber::EnvFilter;

use markhub_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing pipeline from telemetry settings.
///
/// `RUST_LOG` wins over the configured filter. Safe to call more than once;
/// later calls are ignored (tests may have installed a subscriber already).
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));

    let result = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
