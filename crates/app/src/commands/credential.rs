//! Credential commands

use livegate_domain::{LiveGateError, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Store the API key; a blank value clears it. Returns whether a key is now
/// configured.
pub async fn set_credential(ctx: &AppContext, value: &str) -> Result<bool> {
    execute_command(
        ctx,
        "credential::set",
        || async {
            let credential = ctx.session.credential().set(value).await;
            Ok::<_, LiveGateError>(credential.is_configured())
        },
        |configured: &bool| {
            if *configured {
                "API key saved".to_string()
            } else {
                "API key cleared".to_string()
            }
        },
    )
    .await
}

/// Whether an API key is configured
pub fn credential_status(ctx: &AppContext) -> bool {
    ctx.session.credential().is_configured()
}

/// The configured key with all but its last four characters hidden
pub fn masked_credential(ctx: &AppContext) -> Option<String> {
    let credential = ctx.session.credential().get();
    credential.is_configured().then(|| mask(credential.expose()))
}

fn mask(value: &str) -> String {
    let visible: String = {
        let tail: Vec<char> = value.chars().rev().take(4).collect();
        tail.into_iter().rev().collect()
    };
    let hidden = value.chars().count().saturating_sub(visible.chars().count());
    format!("{}{visible}", "*".repeat(hidden.max(4)))
}
