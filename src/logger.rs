//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; embedding programs call
//! [`init`] once to route them to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggerSettings};
use crate::errors::{Error, Result};

const MODULE_WHITELIST: &[&str] = &["gocam_legacy"];

/// Installs the global subscriber described by `settings`.
///
/// `RUST_LOG` wins over the configured level unless `override_filter` is set.
/// Calling it again after a subscriber is installed is a no-op.
///
/// # Errors
///
/// Fails when `override_filter` holds invalid directives.
pub fn init(settings: &LoggerSettings) -> Result<()> {
    if !settings.enable {
        return Ok(());
    }

    let filter = match &settings.override_filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|err| Error::Logger(format!("invalid filter `{directives}`: {err}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let directives = MODULE_WHITELIST
                .iter()
                .map(|module| format!("{module}={}", settings.level))
                .collect::<Vec<_>>()
                .join(",");
            EnvFilter::new(directives)
        }),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match settings.format {
        LogFormat::Compact => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("logger already initialized");
    }
    Ok(())
}
