//! sqlx-backed implementations of the store contracts

use async_trait::async_trait;
use shared::models::{Order, OrderCreate, OrderStatus, OrderWithProduct, Payment, Product, Ticket};
use sqlx::SqlitePool;

use super::{CatalogStore, OrderStore, PaymentStore, StaffCaller, TicketStore};
use crate::db::repository::{RepoResult, order, payment, product, ticket, waiter_call};

/// Every SQLite-backed store over one pool
#[derive(Clone, Debug)]
pub struct SqliteStores {
    pool: SqlitePool,
}

impl SqliteStores {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for SqliteStores {
    async fn get_ticket(&self, id: i64) -> RepoResult<Option<Ticket>> {
        ticket::find_by_id(&self.pool, id).await
    }

    async fn find_active_ticket(&self, user_id: i64) -> RepoResult<Option<Ticket>> {
        ticket::find_active_by_user(&self.pool, user_id).await
    }

    async fn create_ticket(&self, user_id: i64) -> RepoResult<Ticket> {
        ticket::create(&self.pool, user_id).await
    }
}

#[async_trait]
impl OrderStore for SqliteStores {
    async fn get_order(&self, id: i64) -> RepoResult<Option<Order>> {
        order::find_by_id(&self.pool, id).await
    }

    async fn orders_by_ticket_and_status(
        &self,
        ticket_id: i64,
        statuses: &[OrderStatus],
    ) -> RepoResult<Vec<OrderWithProduct>> {
        order::find_by_ticket_and_status(&self.pool, ticket_id, statuses).await
    }

    async fn orders_by_status(&self, statuses: &[OrderStatus]) -> RepoResult<Vec<OrderWithProduct>> {
        order::find_by_status(&self.pool, statuses).await
    }

    async fn insert_order(&self, data: &OrderCreate) -> RepoResult<Order> {
        order::create(&self.pool, data).await
    }

    async fn transition_order(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<bool> {
        order::transition(&self.pool, id, from, to).await
    }

    async fn update_orders_status(
        &self,
        ticket_id: i64,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> RepoResult<u64> {
        order::update_status_by_ticket(&self.pool, ticket_id, from, to).await
    }

    async fn delete_selected_order(&self, id: i64) -> RepoResult<bool> {
        order::delete_selected(&self.pool, id).await
    }
}

#[async_trait]
impl CatalogStore for SqliteStores {
    async fn get_product(&self, id: i64) -> RepoResult<Option<Product>> {
        product::find_by_id(&self.pool, id).await
    }
}

#[async_trait]
impl PaymentStore for SqliteStores {
    async fn settle_ticket(
        &self,
        ticket_id: i64,
        expected_total: i64,
        total_value: i64,
        is_splitted: bool,
    ) -> RepoResult<(Ticket, Payment)> {
        payment::settle_ticket(&self.pool, ticket_id, expected_total, total_value, is_splitted)
            .await
    }
}

#[async_trait]
impl StaffCaller for SqliteStores {
    async fn request_staff_call(&self, user_id: i64, payer_name: &str) -> RepoResult<()> {
        let call_id = waiter_call::create(&self.pool, user_id, payer_name).await?;
        tracing::info!(user_id, call_id, "Staff call requested");
        Ok(())
    }
}
