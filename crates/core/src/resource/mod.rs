//! Resources: object keys as API callers see them.
//!
//! This module provides:
//! - The `Resource` / `ListResult` types and their JSON shape
//! - Key → resource mapping (basename, trailing-slash-as-folder)
//! - The resource service: metadata, download and folder listing

mod download;
mod mapper;
mod service;
mod types;

pub use download::DownloadedFile;
pub use mapper::{KEY_SEPARATOR, key_to_resource};
pub use service::ResourceService;
pub use types::{ListResult, Resource, ResourceType};
