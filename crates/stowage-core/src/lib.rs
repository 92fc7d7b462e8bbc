//! Stowage Core Library
//!
//! This crate provides configuration, error types, and response models
//! shared by the storage engine and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, UploadSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::UploadResponse;
