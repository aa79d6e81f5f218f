//! Checkout reconciliation
//!
//! - **tolerance**: accepted payment range for a delivered total
//! - **engine**: `CheckoutEngine`, bulk order moves and pay-and-close
//! - **follow_up**: `FollowUpWorker`, staff calls and archival after payment
//!
//! # Data Flow
//!
//! ```text
//! pay_and_close ─▶ checks ─▶ settle_ticket (one transaction) ─▶ receipt
//!                                   │
//!                                   └─ SettlementEvent ─▶ FollowUpWorker
//!                                                          ├─ StaffCaller (split bills)
//!                                                          └─ ArchiveStore (with retry)
//! ```

pub mod engine;
pub mod follow_up;
pub mod tolerance;


pub use engine::{CheckoutEngine, CheckoutReceipt};
pub use follow_up::{FollowUpWorker, RetryPolicy, SettlementEvent};
pub use tolerance::ToleranceBand;
