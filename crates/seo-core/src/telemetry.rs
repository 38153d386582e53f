//! Tracing subscriber setup for the binary

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Failure to install the global subscriber
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Filter directive did not parse
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        /// Directive as given
        filter: String,
        /// Parser error
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already set
    #[error("tracing already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter: `RUST_LOG` wins over `fallback`
///
/// # Errors
/// Returns `TelemetryError::Filter` if `fallback` is used and does not parse.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(fallback).map_err(|source| TelemetryError::Filter {
            filter: fallback.to_string(),
            source,
        })
    })
}

/// Install a fmt subscriber writing to stderr
///
/// # Errors
/// Returns `TelemetryError` if the filter is malformed or a subscriber is
/// already installed.
pub fn init_tracing(filter: &str) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(filter)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
