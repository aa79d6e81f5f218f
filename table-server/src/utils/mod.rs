//! Utilities: error bridging, logging and input validation
//!
//! - [`AppError`] - application error type (from shared::error)
//! - [`ApiResponse`] - API response envelope (from shared::error)

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
