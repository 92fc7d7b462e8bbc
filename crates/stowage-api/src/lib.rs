//! Stowage HTTP API
//!
//! Exposes the upload pipeline from `stowage-storage` over axum: the
//! multipart upload endpoint, health and usage routes, and the OpenAPI
//! document.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
