//! Shared configuration and error types for Bucketfront.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application configuration (server, storage credentials, listing)
//! - The application-wide error taxonomy

pub mod config;
pub mod error;

pub use config::{AppConfig, ListingSettings, ServerSettings, StorageSettings};
pub use error::{AppError, AppResult};
