//! AppContext construction, rehydration and shutdown

mod support;

use livegate_domain::JobStatus;
use livegate_lib::commands;
use livegate_lib::context::AppContext;
use support::{test_config, test_context};
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread")]
async fn fresh_context_is_hydrated_with_the_configured_default() {
    let (ctx, _dir) = test_context("http://127.0.0.1:1/api", "http://gateway.local:8080/").await;

    assert!(ctx.session.is_hydrated());
    let endpoints = commands::list_endpoints(&ctx);
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].url, "http://gateway.local:8080");
    assert!(endpoints[0].is_selected);
    assert!(!commands::credential_status(&ctx));
    assert_eq!(commands::job_state(&ctx).status, JobStatus::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn state_survives_a_restart() {
    let dir = TempDir::new().expect("temp dir");
    let config = test_config(dir.path(), "http://127.0.0.1:1/api", "http://a.local");

    {
        let ctx = AppContext::new_with_config(config.clone()).await.expect("first context");
        let b = commands::add_endpoint(&ctx, "B", "http://b.local").await.expect("add");
        commands::select_endpoint(&ctx, b.id.as_str()).await.expect("select");
        commands::set_credential(&ctx, "  key-123  ").await.expect("credential");
        ctx.shutdown();
    }

    let ctx = AppContext::new_with_config(config).await.expect("second context");
    let endpoints = commands::list_endpoints(&ctx);
    assert_eq!(endpoints.len(), 2);
    assert_eq!(ctx.session.registry().selected().map(|e| e.tag).as_deref(), Some("B"));
    assert_eq!(commands::masked_credential(&ctx).as_deref(), Some("****-123"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unopenable_storage_fails_construction() {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").expect("write");

    let mut config = test_config(dir.path(), "http://127.0.0.1:1/api", "http://a.local");
    config.storage.path = blocker.join("livegate.db").to_string_lossy().into_owned();

    assert!(AppContext::new_with_config(config).await.is_err());
}
