//! Core logic for Bucketfront.
//!
//! This crate contains everything between the HTTP layer and the bucket,
//! with no web dependencies.
//!
//! # Modules
//!
//! - `resource` - Resource model, key mapping and the resource service
//! - `storage` - Object store trait and its OpenDAL implementation

pub mod resource;
pub mod storage;
