//! Order service: cart and kitchen operations on single order lines

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    CallerContext, Order, OrderCreate, OrderStatus, OrderWithProduct, Ticket,
};

use super::lifecycle::Transition;
use crate::db::repository::RepoError;
use crate::stores::{CatalogStore, OrderStore, TicketStore};
use crate::utils::AppResult;
use crate::utils::validation::validate_order_create;

#[derive(Clone)]
pub struct OrderService {
    tickets: Arc<dyn TicketStore>,
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl OrderService {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            tickets,
            orders,
            catalog,
        }
    }

    async fn ticket(&self, ticket_id: i64) -> AppResult<Ticket> {
        self.tickets
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| AppError::ticket_not_found(ticket_id))
    }

    async fn order(&self, order_id: i64) -> AppResult<Order> {
        self.orders
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id))
    }

    /// Put a product line into the caller's cart as SELECTED
    pub async fn add_order(&self, caller: &CallerContext, data: OrderCreate) -> AppResult<Order> {
        validate_order_create(&data)?;

        let ticket = self.ticket(data.ticket_id).await?;
        if !ticket.status.is_active() {
            return Err(ticket_paid(ticket.id));
        }
        if !ticket.is_owned_by(caller.user_id) {
            return Err(AppError::not_owner("ticket"));
        }
        if self.catalog.get_product(data.product_id).await?.is_none() {
            return Err(AppError::product_not_found(data.product_id));
        }

        // settled between the check above and the insert
        let order = self
            .orders
            .insert_order(&data)
            .await
            .map_err(|e| match e {
                RepoError::Conflict(_) => ticket_paid(data.ticket_id),
                other => other.into(),
            })?;
        tracing::info!(
            order_id = order.id,
            ticket_id = order.ticket_id,
            product_id = order.product_id,
            amount = order.amount,
            "Order added to cart"
        );
        Ok(order)
    }

    /// SELECTED orders of a ticket
    pub async fn list_cart(&self, ticket_id: i64) -> AppResult<Vec<OrderWithProduct>> {
        self.ticket(ticket_id).await?;
        Ok(self
            .orders
            .orders_by_ticket_and_status(ticket_id, &[OrderStatus::Selected])
            .await?)
    }

    /// Kitchen queue: PREPARING orders across all tickets
    pub async fn list_preparing(&self, caller: &CallerContext) -> AppResult<Vec<OrderWithProduct>> {
        if !caller.is_admin() {
            return Err(AppError::admin_required());
        }
        Ok(self.orders.orders_by_status(&[OrderStatus::Preparing]).await?)
    }

    /// SELECTED -> PREPARING
    pub async fn start_preparing(&self, caller: &CallerContext, order_id: i64) -> AppResult<Order> {
        self.apply(caller, order_id, Transition::StartPreparing).await
    }

    /// PREPARING -> DELIVERED
    pub async fn deliver(&self, caller: &CallerContext, order_id: i64) -> AppResult<Order> {
        self.apply(caller, order_id, Transition::Deliver).await
    }

    async fn apply(
        &self,
        caller: &CallerContext,
        order_id: i64,
        transition: Transition,
    ) -> AppResult<Order> {
        transition.authorize(caller)?;

        let moved = self
            .orders
            .transition_order(order_id, transition.from(), transition.to())
            .await?;
        // re-read: the order either moved, never existed, or sits in another state
        let order = self.order(order_id).await?;
        if !moved {
            tracing::warn!(
                order_id,
                status = %order.status,
                ?transition,
                "Order transition rejected"
            );
            return Err(transition.rejected(order_id, order.status));
        }

        tracing::info!(
            order_id,
            ticket_id = order.ticket_id,
            status = %order.status,
            "Order status changed"
        );
        Ok(order)
    }

    /// Remove a SELECTED order from the owner's cart
    pub async fn delete_order(&self, caller: &CallerContext, order_id: i64) -> AppResult<Order> {
        let order = self.order(order_id).await?;
        let ticket = self.ticket(order.ticket_id).await?;
        if !ticket.is_owned_by(caller.user_id) {
            return Err(AppError::not_owner("order"));
        }

        if !self.orders.delete_selected_order(order_id).await? {
            let current = self.order(order_id).await?;
            tracing::warn!(order_id, status = %current.status, "Delete rejected, order left the cart");
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                format!(
                    "Order {order_id} is {}, only SELECTED orders can be deleted",
                    current.status
                ),
            ));
        }

        tracing::info!(order_id, ticket_id = order.ticket_id, "Order deleted from cart");
        Ok(order)
    }
}

fn ticket_paid(ticket_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::TicketAlreadyPaid,
        format!("Ticket {ticket_id} is already paid"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryStores;

    fn service(stores: &MemoryStores) -> OrderService {
        let s = Arc::new(stores.clone());
        OrderService::new(s.clone(), s.clone(), s)
    }

    fn create(ticket_id: i64, product_id: i64) -> OrderCreate {
        OrderCreate {
            ticket_id,
            product_id,
            amount: 2,
            total_value: 3000,
            optionals: Some("no onions".into()),
        }
    }

    #[tokio::test]
    async fn test_add_order_starts_selected() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Burger", 1500);
        let ticket = stores.seed_ticket(1);

        let order = service(&stores)
            .add_order(&CallerContext::client(1), create(ticket.id, product.id))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Selected);
        assert_eq!(order.total_value, 3000);
    }

    #[tokio::test]
    async fn test_add_order_missing_ticket_or_product() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Burger", 1500);
        let ticket = stores.seed_ticket(1);
        let svc = service(&stores);
        let caller = CallerContext::client(1);

        let err = svc.add_order(&caller, create(999, product.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TicketNotFound);

        let err = svc.add_order(&caller, create(ticket.id, 999)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn test_add_order_rejects_foreign_ticket() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Burger", 1500);
        let ticket = stores.seed_ticket(1);

        let err = service(&stores)
            .add_order(&CallerContext::client(2), create(ticket.id, product.id))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);
    }

    #[tokio::test]
    async fn test_deliver_only_from_preparing() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let ticket = stores.seed_ticket(1);
        let svc = service(&stores);
        let admin = CallerContext::admin(99);

        let selected = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Selected);
        let delivered = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Delivered);
        let preparing = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Preparing);

        for id in [selected.id, delivered.id] {
            let err = svc.deliver(&admin, id).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidTransition);
            assert_eq!(err.http_status(), http::StatusCode::UNAUTHORIZED);
        }
        assert_eq!(stores.order_status(selected.id), Some(OrderStatus::Selected));

        let order = svc.deliver(&admin, preparing.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_deliver_missing_and_non_admin() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let ticket = stores.seed_ticket(1);
        let preparing = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Preparing);
        let svc = service(&stores);

        let err = svc.deliver(&CallerContext::admin(9), 12345).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        let err = svc.deliver(&CallerContext::client(1), preparing.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(stores.order_status(preparing.id), Some(OrderStatus::Preparing));
    }

    #[tokio::test]
    async fn test_start_preparing() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let ticket = stores.seed_ticket(1);
        let selected = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Selected);
        let svc = service(&stores);
        let admin = CallerContext::admin(9);

        let order = svc.start_preparing(&admin, selected.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);

        let err = svc.start_preparing(&admin, selected.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_delete_selected_by_owner() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let ticket = stores.seed_ticket(1);
        let order = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Selected);
        let svc = service(&stores);

        svc.delete_order(&CallerContext::client(1), order.id).await.unwrap();
        assert!(svc.list_cart(ticket.id).await.unwrap().is_empty());
        assert_eq!(stores.order_status(order.id), None);
    }

    #[tokio::test]
    async fn test_delete_rejections() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let ticket = stores.seed_ticket(1);
        let selected = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Selected);
        let preparing = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Preparing);
        let delivered = stores.seed_order(ticket.id, product.id, 500, OrderStatus::Delivered);
        let svc = service(&stores);
        let owner = CallerContext::client(1);

        let err = svc.delete_order(&CallerContext::client(2), selected.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotOwner);

        for id in [preparing.id, delivered.id] {
            let err = svc.delete_order(&owner, id).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidTransition);
        }

        let err = svc.delete_order(&owner, 4242).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        assert_eq!(stores.order_status(selected.id), Some(OrderStatus::Selected));
    }

    #[tokio::test]
    async fn test_kitchen_queue_is_admin_only() {
        let stores = MemoryStores::new();
        let product = stores.seed_product("Soda", 500);
        let t1 = stores.seed_ticket(1);
        let t2 = stores.seed_ticket(2);
        stores.seed_order(t1.id, product.id, 500, OrderStatus::Preparing);
        stores.seed_order(t2.id, product.id, 500, OrderStatus::Preparing);
        stores.seed_order(t2.id, product.id, 500, OrderStatus::Selected);
        let svc = service(&stores);

        let err = svc.list_preparing(&CallerContext::client(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);

        let queue = svc.list_preparing(&CallerContext::admin(9)).await.unwrap();
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|o| o.order.status == OrderStatus::Preparing));
        assert_eq!(queue[0].product_name, "Soda");
    }

    #[tokio::test]
    async fn test_list_cart_missing_ticket() {
        let stores = MemoryStores::new();
        let err = service(&stores).list_cart(77).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::TicketNotFound);
    }
}
