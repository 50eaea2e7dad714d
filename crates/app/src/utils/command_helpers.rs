//! Command execution helpers
//!
//! Every command goes through [`execute_command`] so timing, logging and the
//! outcome notification stay uniform.

use std::future::Future;
use std::time::Instant;

use livegate_domain::Result as DomainResult;

use crate::context::{AppContext, Notification};
use crate::utils::logging::log_command_execution;

/// Execute a command, log its outcome and publish a notification.
///
/// On success the notification message comes from `describe`; on failure it
/// is the error's display text.
pub async fn execute_command<F, Fut, T, D>(
    ctx: &AppContext,
    command_name: &str,
    command_fn: F,
    describe: D,
) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
    D: FnOnce(&T) -> String,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());

    let notification = match &result {
        Ok(value) => Notification::success(command_name, describe(value)),
        Err(err) => Notification::error(command_name, err.to_string()),
    };
    ctx.notify(notification);

    result
}
