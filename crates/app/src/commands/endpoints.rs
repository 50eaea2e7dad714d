//! Endpoint registry commands

use std::time::Instant;

use livegate_domain::{Endpoint, EndpointId, EndpointPatch, LiveGateError, ProbeStatus, Result};

use crate::context::{AppContext, Notification};
use crate::utils::command_helpers::execute_command;
use crate::utils::logging::log_command_execution;

/// All endpoints in registry order
pub fn list_endpoints(ctx: &AppContext) -> Vec<Endpoint> {
    ctx.session.registry().list()
}

/// Add an endpoint; rejected once the registry is full
pub async fn add_endpoint(ctx: &AppContext, tag: &str, url: &str) -> Result<Endpoint> {
    execute_command(
        ctx,
        "endpoints::add",
        || async { ctx.session.registry().add(tag, url).await.map_err(LiveGateError::from) },
        |endpoint: &Endpoint| format!("Endpoint '{}' added", endpoint.tag),
    )
    .await
}

/// Apply a non-empty patch to endpoint `id`
pub async fn update_endpoint(ctx: &AppContext, id: &str, patch: EndpointPatch) -> Result<Endpoint> {
    execute_command(
        ctx,
        "endpoints::update",
        || update(ctx, id, patch),
        |endpoint: &Endpoint| format!("Endpoint '{}' updated", endpoint.tag),
    )
    .await
}

/// Remove endpoint `id`; the last endpoint cannot be removed
pub async fn remove_endpoint(ctx: &AppContext, id: &str) -> Result<()> {
    execute_command(
        ctx,
        "endpoints::remove",
        || async {
            ctx.session.registry().remove(&EndpointId::from(id)).await.map_err(LiveGateError::from)
        },
        |_| "Endpoint removed".to_string(),
    )
    .await
}

/// Select `id` and return the newly selected endpoint
pub async fn select_endpoint(ctx: &AppContext, id: &str) -> Result<Endpoint> {
    execute_command(
        ctx,
        "endpoints::select",
        || select(ctx, id),
        |endpoint: &Endpoint| format!("Using '{}'", endpoint.tag),
    )
    .await
}

async fn update(ctx: &AppContext, id: &str, patch: EndpointPatch) -> Result<Endpoint> {
    if patch.is_empty() {
        return Err(LiveGateError::InvalidInput("nothing to update".to_string()));
    }
    Ok(ctx.session.registry().update(&EndpointId::from(id), patch).await?)
}

async fn select(ctx: &AppContext, id: &str) -> Result<Endpoint> {
    let id = EndpointId::from(id);
    let registry = ctx.session.registry();
    registry.select(&id).await?;
    registry.get(&id).ok_or_else(|| LiveGateError::NotFound(format!("Endpoint not found: {id}")))
}

/// Probe the selected endpoint, or `url` when given.
///
/// Never fails; an unreachable target is reported as
/// [`ProbeStatus::Inactive`] with an error-level notification.
pub async fn probe_endpoint(ctx: &AppContext, url: Option<&str>) -> ProbeStatus {
    let start = Instant::now();
    let status = ctx.session.registry().probe(url).await;
    log_command_execution("endpoints::probe", start.elapsed(), None);

    let notification = if status.is_active() {
        Notification::success("endpoints::probe", "Endpoint is reachable")
    } else {
        Notification::error("endpoints::probe", "Endpoint is not reachable")
    };
    ctx.notify(notification);
    status
}
