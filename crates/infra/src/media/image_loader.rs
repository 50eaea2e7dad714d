//! Filesystem image loader
//!
//! Reads image files with `tokio::fs` and decodes them with the `image`
//! crate on the blocking pool. The format is sniffed from the content, not
//! the extension.

use std::io::Cursor;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageReader;
use livegate_core::{DecodedImage, ImageLoader};
use livegate_domain::{ImageInfo, InputFile, LiveGateError, Result as DomainResult};
use tokio::task;
use tracing::debug;

use crate::errors::{map_join_error, InfraError};

/// [`ImageLoader`] over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

impl FsImageLoader {
    /// Create a loader
    pub fn new() -> Self {
        Self
    }

    async fn read(file: &InputFile) -> DomainResult<Vec<u8>> {
        tokio::fs::read(&file.path).await.map_err(|e| InfraError::from(e).into())
    }
}

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn decode(&self, file: &InputFile) -> DomainResult<DecodedImage> {
        let bytes = Self::read(file).await?;
        let name = file.name.clone();

        let decoded = task::spawn_blocking(move || inspect(bytes, name))
            .await
            .map_err(map_join_error)??;

        debug!(
            file = %decoded.info.name,
            width = decoded.info.width,
            height = decoded.info.height,
            mime = %decoded.info.mime_type,
            "image decoded"
        );
        Ok(decoded)
    }

    async fn encode_base64(&self, file: &InputFile) -> DomainResult<String> {
        let bytes = Self::read(file).await?;
        Ok(STANDARD.encode(bytes))
    }
}

/// Decode `bytes` fully and derive the image metadata.
fn inspect(bytes: Vec<u8>, name: String) -> DomainResult<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(InfraError::from)?;
    let format = reader
        .format()
        .ok_or_else(|| LiveGateError::Media(format!("unrecognised image format: {name}")))?;
    let image = reader.decode().map_err(InfraError::from)?;

    let info = ImageInfo {
        width: image.width(),
        height: image.height(),
        size_bytes: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
        name,
        mime_type: format.to_mime_type().to_string(),
    };
    Ok(DecodedImage { info, bytes })
}
