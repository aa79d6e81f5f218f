//! Collaborator contracts of the ordering core
//!
//! ```text
//!        OrderService / CheckoutEngine
//!                     │
//!   ┌──────────┬──────┴─────┬────────────┬─────────────┐
//!   ▼          ▼            ▼            ▼             ▼
//! TicketStore OrderStore PaymentStore ArchiveStore StaffCaller
//!   │          │            │            │             │
//!   └──── SqliteStores (sqlx) ───┘  RedbArchive   SqliteStores
//! ```
//!
//! Services hold `Arc<dyn Trait>`; tests swap in the in-memory doubles.

mod archive;
#[cfg(test)]
pub(crate) mod memory;
mod sqlite;

pub use archive::RedbArchive;
pub use sqlite::SqliteStores;

use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::models::{Order, OrderCreate, OrderStatus, OrderWithProduct, Payment, Product, Ticket};

use crate::db::repository::RepoResult;

/// Ticket lookup and creation
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn get_ticket(&self, id: i64) -> RepoResult<Option<Ticket>>;

    /// The user's non-paid ticket, if any
    async fn find_active_ticket(&self, user_id: i64) -> RepoResult<Option<Ticket>>;

    /// Create a RESERVED ticket; `Duplicate` if the user already has an active one
    async fn create_ticket(&self, user_id: i64) -> RepoResult<Ticket>;
}

/// Order lines and their status
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, id: i64) -> RepoResult<Option<Order>>;

    async fn orders_by_ticket_and_status(
        &self,
        ticket_id: i64,
        statuses: &[OrderStatus],
    ) -> RepoResult<Vec<OrderWithProduct>>;

    /// Orders in `statuses` across every ticket
    async fn orders_by_status(&self, statuses: &[OrderStatus]) -> RepoResult<Vec<OrderWithProduct>>;

    async fn insert_order(&self, data: &OrderCreate) -> RepoResult<Order>;

    /// Compare-and-set a single order; false if it is missing or not in `from`
    async fn transition_order(&self, id: i64, from: OrderStatus, to: OrderStatus)
    -> RepoResult<bool>;

    /// Move every order of the ticket in `from` to `to`, returning how many moved
    async fn update_orders_status(
        &self,
        ticket_id: i64,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> RepoResult<u64>;

    /// Delete an order that is still SELECTED; false otherwise
    async fn delete_selected_order(&self, id: i64) -> RepoResult<bool>;
}

/// Menu lookup
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_product(&self, id: i64) -> RepoResult<Option<Product>>;
}

/// Payment recording
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Record the payment and mark the ticket PAID as one unit of work
    ///
    /// Only settles while the ticket has no SELECTED/PREPARING orders and its
    /// DELIVERED lines still sum to `expected_total`. Returns `Duplicate` when
    /// the ticket was already settled and `Conflict` when its orders changed.
    async fn settle_ticket(
        &self,
        ticket_id: i64,
        expected_total: i64,
        total_value: i64,
        is_splitted: bool,
    ) -> RepoResult<(Ticket, Payment)>;
}

/// Schema-less archive of finished tickets
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Write-once; `Duplicate` if the ticket is already archived
    async fn append_finished_ticket(
        &self,
        ticket_id: i64,
        record: Map<String, Value>,
    ) -> RepoResult<()>;

    async fn list_finished_tickets(&self) -> RepoResult<Vec<Map<String, Value>>>;
}

/// "Summon staff to the table"
#[async_trait]
pub trait StaffCaller: Send + Sync {
    async fn request_staff_call(&self, user_id: i64, payer_name: &str) -> RepoResult<()>;
}
