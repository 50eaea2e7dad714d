//! Generic JSON proxy command for the auxiliary services of the selected
//! endpoint (decode, encode, analysis, detokenize)

use livegate_domain::{LiveGateError, Result};
use serde_json::Value;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// POST `body` to `path` on the selected endpoint
pub async fn proxy_post(ctx: &AppContext, path: &str, body: Value) -> Result<Value> {
    execute_command(
        ctx,
        "proxy::post",
        || async { ctx.proxy.post_json(path, &body).await.map_err(LiveGateError::from) },
        |_| format!("Request to '{path}' completed"),
    )
    .await
}
