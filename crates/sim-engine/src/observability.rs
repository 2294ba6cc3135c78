//! Console logging initialization.
//!
//! The engine itself only emits `tracing` events; an embedding application
//! decides how they are subscribed to. This helper installs a plain console
//! subscriber with an environment-driven filter for binaries and tests that
//! want one.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors from initializing the logging subscriber.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber was already installed.
    #[error("failed to initialize tracing: {0}")]
    Init(String),
}

/// Install a console `tracing` subscriber.
///
/// The filter is taken from `RUST_LOG` when set, falling back to
/// `default_filter` (e.g. `"info"`).
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) -> Result<(), ObservabilityError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ObservabilityError::Init(e.to_string()))
}
