//! Tracing setup and structured command logging

use std::io;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::{SubscriberInitExt as _, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};
use vknet_infra::ApiError;

/// Filter used when `RUST_LOG` is unset. Matches every `vknet*` target.
pub const DEFAULT_LOG_FILTER: &str = "vknet=info";

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`]. With `json` set, events are
/// emitted as one JSON object per line.
///
/// # Errors
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_writer(io::stderr)).try_init()
    } else {
        registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init()
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"friends"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - Failure, if any.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&ApiError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(e) => warn!(
            command,
            duration_ms,
            error_type = error_label(e),
            error = %e,
            "command_execution_failure"
        ),
    }
}

/// Convert an `ApiError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ApiError) -> &'static str {
    error.category().as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&ApiError::Transport("down".into())), "transport");
        assert_eq!(
            error_label(&ApiError::RemoteApi { code: 5, message: "auth".into() }),
            "remote_api"
        );
        assert_eq!(error_label(&ApiError::UnknownRemote { raw: "<error/>".into() }), "remote_api");
    }
}
