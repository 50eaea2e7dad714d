//! Local image types
//!
//! Metadata derived from a decoded local image and the transient preview
//! handle used to display it without persisting anything.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;

/// Metadata of a decoded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub name: String,
    pub mime_type: String,
}

impl ImageInfo {
    /// Resolution formatted as `WxH`.
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Human-readable file size
    pub fn size_formatted(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Handle to a transient preview.
///
/// Must be released exactly once through the preview store that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewRef(pub String);

impl PreviewRef {
    /// Fresh random preview handle
    pub fn generate() -> Self {
        Self(format!("preview:{}", Uuid::new_v4()))
    }
}

impl std::fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local file handed to the batch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Original file name, including extension
    pub name: String,
    pub path: std::path::PathBuf,
}

impl InputFile {
    /// Build from a path, using its final component as the name.
    pub fn from_path(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }

    /// Whether the file name has a supported image extension
    pub fn has_supported_extension(&self) -> bool {
        has_supported_extension(&self.name)
    }

    /// File name without its extension
    pub fn title(&self) -> String {
        title_from_file_name(&self.name)
    }
}

/// Case-insensitive check against the supported image extensions.
pub fn has_supported_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// File name with its final extension stripped (`"a.b.png"` -> `"a.b"`).
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}

/// Human-readable byte size (`"512 B"`, `"1.50 KB"`, `"2.00 MB"`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value < KB {
        format!("{bytes} B")
    } else if value < MB {
        format!("{:.2} KB", value / KB)
    } else if value < GB {
        format!("{:.2} MB", value / MB)
    } else {
        format!("{:.2} GB", value / GB)
    }
}
