use std::time::Duration;

use livegate_domain::LiveGateError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Returns `false` if a subscriber
/// was already installed.
pub fn init_tracing(level: &str, json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"endpoints::add"`; callers must
/// not put credential values in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&LiveGateError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert a `LiveGateError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &LiveGateError) -> &'static str {
    match error {
        LiveGateError::Storage(_) => "storage",
        LiveGateError::Config(_) => "config",
        LiveGateError::Network(_) => "network",
        LiveGateError::Media(_) => "media",
        LiveGateError::NotFound(_) => "not_found",
        LiveGateError::InvalidInput(_) => "invalid_input",
        LiveGateError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&LiveGateError::NotFound("x".into())), "not_found");
        assert_eq!(error_label(&LiveGateError::Network("x".into())), "network");
    }
}
