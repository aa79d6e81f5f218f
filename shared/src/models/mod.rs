//! Data models
//!
//! Shared between table-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all money is integer units.

pub mod archive;
pub mod caller;
pub mod order;
pub mod payment;
pub mod product;
pub mod ticket;

// Re-exports
pub use archive::*;
pub use caller::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use ticket::*;
