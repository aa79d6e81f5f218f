//! Shared types for the table ordering service
//!
//! Domain models, the error system and response envelope used by
//! table-server and anything that talks to its HTTP API.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
