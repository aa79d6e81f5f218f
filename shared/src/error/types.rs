//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type of the service, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error (422)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create an invalid identifier error (422)
    pub fn invalid_id(field: &str, raw: &str) -> Self {
        Self::with_message(ErrorCode::InvalidFormat, format!("{field} must be a positive integer"))
            .with_detail("field", field)
            .with_detail("value", raw)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a ticket not found error
    pub fn ticket_not_found(ticket_id: i64) -> Self {
        Self::with_message(ErrorCode::TicketNotFound, format!("Ticket {ticket_id} not found"))
            .with_detail("ticket_id", ticket_id)
    }

    /// Create an order not found error
    pub fn order_not_found(order_id: i64) -> Self {
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
            .with_detail("order_id", order_id)
    }

    /// Create a product not found error
    pub fn product_not_found(product_id: i64) -> Self {
        Self::with_message(ErrorCode::ProductNotFound, format!("Product {product_id} not found"))
            .with_detail("product_id", product_id)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an unauthorized error (alias for not_authenticated)
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an admin required error (401)
    pub fn admin_required() -> Self {
        Self::new(ErrorCode::AdminRequired)
    }

    /// Create a not owner error (401)
    pub fn not_owner(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotOwner, format!("{r} belongs to another user"))
            .with_detail("resource", r)
    }

    /// Create a permission denied error (403)
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create a conflict error (409)
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Unified API response structure
///
/// Provides a consistent response format for all API endpoints:
/// - `code`: Error code (0 for success)
/// - `message`: Human-readable message
/// - `data`: Response payload (on success)
/// - `details`: Additional error details (on failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Additional error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors are logged in full, the client only sees the generic message
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            let body = ApiResponse::<()>::error(&AppError::new(self.code));
            return (status, Json(body)).into_response();
        }

        let body = ApiResponse::<()>::error(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::UnfulfilledOrders);
        assert_eq!(err.code, ErrorCode::UnfulfilledOrders);
        assert_eq!(err.message, ErrorCode::UnfulfilledOrders.message());
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_detail() {
        let err = AppError::ticket_not_found(42);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        let details = err.details.unwrap();
        assert_eq!(details.get("ticket_id"), Some(&Value::from(42)));
    }

    #[test]
    fn test_invalid_id_is_unprocessable() {
        let err = AppError::invalid_id("ticketId", "unknown");
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            err.details.unwrap().get("value"),
            Some(&Value::from("unknown"))
        );
    }

    #[test]
    fn test_error_response_shape() {
        let err = AppError::not_owner("order");
        let body = ApiResponse::<()>::error(&err);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 2002);
        assert_eq!(json["message"], "order belongs to another user");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_response_shape() {
        let body = ApiResponse::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("details").is_none());
    }
}
