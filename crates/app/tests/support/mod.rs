#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use livegate_domain::{AppConfig, ApiConfig, DefaultEndpointConfig, StorageConfig};
use livegate_lib::context::{AppContext, Notification};
use tempfile::TempDir;
use tokio::sync::broadcast;

/// Config with storage under `dir`, the liveness API at `api_url` and the
/// default endpoint at `endpoint_url`.
pub fn test_config(dir: &Path, api_url: &str, endpoint_url: &str) -> AppConfig {
    AppConfig {
        storage: StorageConfig { path: dir.join("livegate.db").to_string_lossy().into_owned() },
        api: ApiConfig {
            liveness_url: api_url.to_string(),
            timeout_secs: 5,
            probe_timeout_secs: 2,
        },
        default_endpoint: DefaultEndpointConfig {
            tag: "Default".to_string(),
            url: endpoint_url.to_string(),
        },
        ..AppConfig::default()
    }
}

/// Context backed by a fresh database in its own temp dir
pub async fn test_context(api_url: &str, endpoint_url: &str) -> (AppContext, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let ctx = AppContext::new_with_config(test_config(dir.path(), api_url, endpoint_url))
        .await
        .expect("app context");
    (ctx, dir)
}

pub fn write_png(dir: &Path, name: &str) -> PathBuf {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::new(4, 3).write_to(&mut bytes, ImageFormat::Png).expect("encode png");
    let path = dir.join(name);
    std::fs::write(&path, bytes.into_inner()).expect("write png");
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write file");
    path
}

/// Every notification published so far
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}
