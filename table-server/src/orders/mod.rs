//! Order lifecycle
//!
//! - **lifecycle**: the SELECTED -> PREPARING -> DELIVERED state machine
//! - **service**: `OrderService`, cart and kitchen operations over the stores

pub mod lifecycle;
pub mod service;

pub use lifecycle::Transition;
pub use service::OrderService;
