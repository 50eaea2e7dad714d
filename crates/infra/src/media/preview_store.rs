//! In-memory preview handles
//!
//! Previews are transient: bytes live in memory under a generated
//! `preview:<uuid>` reference until released. Nothing is persisted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dashmap::DashMap;
use livegate_core::PreviewStore;
use livegate_domain::PreviewRef;
use tracing::trace;

struct PreviewEntry {
    bytes: Vec<u8>,
    mime_type: String,
}

/// [`PreviewStore`] keeping preview bytes in memory
#[derive(Default)]
pub struct InMemoryPreviewStore {
    entries: DashMap<PreviewRef, PreviewEntry>,
}

impl InMemoryPreviewStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a live preview as a `data:` URL
    pub fn data_url(&self, preview: &PreviewRef) -> Option<String> {
        self.entries.get(preview).map(|entry| {
            format!("data:{};base64,{}", entry.mime_type, STANDARD.encode(&entry.bytes))
        })
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn create(&self, bytes: Vec<u8>, mime_type: &str) -> PreviewRef {
        let preview = PreviewRef::generate();
        trace!(preview = %preview, size = bytes.len(), "preview created");
        self.entries.insert(preview.clone(), PreviewEntry { bytes, mime_type: mime_type.to_string() });
        preview
    }

    fn release(&self, preview: &PreviewRef) -> bool {
        self.entries.remove(preview).is_some()
    }

    fn live_count(&self) -> usize {
        self.entries.len()
    }
}
