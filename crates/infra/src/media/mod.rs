//! Local image access and preview handles

pub mod image_loader;
pub mod preview_store;

pub use image_loader::FsImageLoader;
pub use preview_store::InMemoryPreviewStore;
