//! Unified error codes for table-order
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Ticket / order errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed (request shape or value)
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Identifier could not be parsed
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Session token is unknown
    SessionInvalid = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Resource belongs to another user
    NotOwner = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Ticket / Order ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Ticket has already been paid
    TicketAlreadyPaid = 4002,
    /// Order not found
    OrderNotFound = 4101,
    /// Order is not in the state the transition requires
    InvalidTransition = 4102,
    /// No order on the ticket can be moved forward
    NoActionableOrders = 4103,

    // ==================== 5xxx: Payment ====================
    /// Submitted amount is outside the accepted band
    PaymentOutOfRange = 5001,
    /// Ticket still has selected or preparing orders
    UnfulfilledOrders = 5002,
    /// Ticket has no delivered orders to charge for
    NothingToCharge = 5003,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Archive storage error
    ArchiveError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::SessionInvalid => "No active session for the given token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotOwner => "Resource belongs to another user",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Ticket / Order
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketAlreadyPaid => "Ticket has already been paid",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Order status does not allow this transition",
            ErrorCode::NoActionableOrders => "Ticket has no orders to move forward",

            // Payment
            ErrorCode::PaymentOutOfRange => "Payment amount is outside the accepted range",
            ErrorCode::UnfulfilledOrders => "Ticket still has orders being selected or prepared",
            ErrorCode::NothingToCharge => "Ticket has no delivered orders",

            // Product
            ErrorCode::ProductNotFound => "Product not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ArchiveError => "Archive storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1005 => Ok(ErrorCode::SessionInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::NotOwner),
            2003 => Ok(ErrorCode::AdminRequired),

            // Ticket / Order
            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::TicketAlreadyPaid),
            4101 => Ok(ErrorCode::OrderNotFound),
            4102 => Ok(ErrorCode::InvalidTransition),
            4103 => Ok(ErrorCode::NoActionableOrders),

            // Payment
            5001 => Ok(ErrorCode::PaymentOutOfRange),
            5002 => Ok(ErrorCode::UnfulfilledOrders),
            5003 => Ok(ErrorCode::NothingToCharge),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ArchiveError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
