//! Object storage access using Apache OpenDAL.
//!
//! The resource service only sees the [`ObjectStore`] trait: head, get and
//! list against one bucket. [`OpendalStore`] implements it for:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO
//! - Local filesystem (development only)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ head_object → op.stat("key")                                     │
//! │ get_object  → op.reader("key") → bytes stream → local file       │
//! │ list_objects→ op.lister_with("prefix/").start_after("token")     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;
mod store;
#[cfg(any(test, feature = "test-utils"))]
mod stub;

pub use config::StorageProvider;
pub use error::StorageError;
pub use service::OpendalStore;
pub use store::{ListObjectsPage, ListObjectsRequest, ObjectHead, ObjectStore};
#[cfg(any(test, feature = "test-utils"))]
pub use stub::{StubFailure, StubStore};
