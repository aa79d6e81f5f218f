//! HTTP status mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 422 Unprocessable Entity
            Self::ValidationFailed | Self::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,

            // 404 Not Found
            Self::NotFound
            | Self::TicketNotFound
            | Self::OrderNotFound
            | Self::ProductNotFound
            | Self::NothingToCharge => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::TicketAlreadyPaid | Self::UnfulfilledOrders => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            //
            // Wrong-state transitions and foreign orders surface as 401, not 422.
            Self::NotAuthenticated
            | Self::SessionInvalid
            | Self::NotOwner
            | Self::AdminRequired
            | Self::InvalidTransition
            | Self::NoActionableOrders => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::PaymentOutOfRange => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ArchiveError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
