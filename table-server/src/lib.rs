//! Table Server - restaurant table ordering backend
//!
//! # Overview
//!
//! Guests open a ticket for their table, add order lines to it, staff move
//! the lines through the kitchen, and the ticket is paid and closed at
//! checkout.
//!
//! # Module layout
//!
//! ```text
//! table-server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # bearer session -> CurrentUser
//! ├── api/           # HTTP routes and handlers
//! ├── tickets/       # opening table sessions
//! ├── orders/        # order lifecycle and cart operations
//! ├── checkout/      # payment reconciliation and follow-ups
//! ├── stores/        # persistence ports and their implementations
//! ├── db/            # SQLite pool and repositories
//! ├── archiving/     # redb store for paid tickets
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod archiving;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod orders;
pub mod stores;
pub mod tickets;
pub mod utils;

// Re-export public types
pub use auth::CurrentUser;
pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env` and initialize logging from the resulting configuration
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}
