//! In-memory store doubles for unit tests

use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::models::{
    Order, OrderCreate, OrderStatus, OrderWithProduct, Payment, Product, Ticket, TicketStatus,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ArchiveStore, CatalogStore, OrderStore, PaymentStore, StaffCaller, TicketStore};
use crate::db::repository::{RepoError, RepoResult};

#[derive(Default)]
struct State {
    next_id: i64,
    tickets: BTreeMap<i64, Ticket>,
    orders: BTreeMap<i64, Order>,
    products: BTreeMap<i64, Product>,
    /// keyed by ticket id
    payments: BTreeMap<i64, Payment>,
    archive: BTreeMap<i64, Map<String, Value>>,
    archive_attempts: u32,
    archive_failures_left: u32,
    staff_calls: Vec<(i64, String)>,
    staff_calls_fail: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn with_product(&self, order: &Order) -> OrderWithProduct {
        let product = self.products.get(&order.product_id);
        OrderWithProduct {
            order: order.clone(),
            product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
            product_description: product.and_then(|p| p.description.clone()),
            product_image: product.and_then(|p| p.image.clone()),
        }
    }
}

/// Shared in-memory backing for every store trait
#[derive(Clone, Default)]
pub(crate) struct MemoryStores {
    state: Arc<Mutex<State>>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn seed_product(&self, name: &str, price: i64) -> Product {
        let mut state = self.lock();
        let product = Product {
            id: state.next_id(),
            name: name.to_string(),
            description: None,
            image: None,
            price,
        };
        state.products.insert(product.id, product.clone());
        product
    }

    pub fn seed_ticket(&self, user_id: i64) -> Ticket {
        let mut state = self.lock();
        let ticket = Ticket {
            id: state.next_id(),
            user_id,
            status: TicketStatus::Reserved,
            created_at: 0,
        };
        state.tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    pub fn seed_order(
        &self,
        ticket_id: i64,
        product_id: i64,
        total_value: i64,
        status: OrderStatus,
    ) -> Order {
        let mut state = self.lock();
        let order = Order {
            id: state.next_id(),
            ticket_id,
            product_id,
            amount: 1,
            total_value,
            optionals: None,
            status,
            created_at: 0,
        };
        state.orders.insert(order.id, order.clone());
        order
    }

    pub fn ticket(&self, id: i64) -> Option<Ticket> {
        self.lock().tickets.get(&id).cloned()
    }

    pub fn order_status(&self, id: i64) -> Option<OrderStatus> {
        self.lock().orders.get(&id).map(|o| o.status)
    }

    pub fn payment_count(&self) -> usize {
        self.lock().payments.len()
    }

    pub fn archived(&self, ticket_id: i64) -> Option<Map<String, Value>> {
        self.lock().archive.get(&ticket_id).cloned()
    }

    pub fn archive_attempts(&self) -> u32 {
        self.lock().archive_attempts
    }

    pub fn staff_calls(&self) -> Vec<(i64, String)> {
        self.lock().staff_calls.clone()
    }

    /// Make the next `n` archive writes fail
    pub fn fail_archive_writes(&self, n: u32) {
        self.lock().archive_failures_left = n;
    }

    pub fn fail_staff_calls(&self) {
        self.lock().staff_calls_fail = true;
    }
}

#[async_trait]
impl TicketStore for MemoryStores {
    async fn get_ticket(&self, id: i64) -> RepoResult<Option<Ticket>> {
        Ok(self.ticket(id))
    }

    async fn find_active_ticket(&self, user_id: i64) -> RepoResult<Option<Ticket>> {
        Ok(self
            .lock()
            .tickets
            .values()
            .find(|t| t.user_id == user_id && t.status.is_active())
            .cloned())
    }

    async fn create_ticket(&self, user_id: i64) -> RepoResult<Ticket> {
        if self.find_active_ticket(user_id).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User {user_id} already has an active ticket"
            )));
        }
        Ok(self.seed_ticket(user_id))
    }
}

#[async_trait]
impl OrderStore for MemoryStores {
    async fn get_order(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn orders_by_ticket_and_status(
        &self,
        ticket_id: i64,
        statuses: &[OrderStatus],
    ) -> RepoResult<Vec<OrderWithProduct>> {
        let state = self.lock();
        Ok(state
            .orders
            .values()
            .filter(|o| o.ticket_id == ticket_id && statuses.contains(&o.status))
            .map(|o| state.with_product(o))
            .collect())
    }

    async fn orders_by_status(&self, statuses: &[OrderStatus]) -> RepoResult<Vec<OrderWithProduct>> {
        let state = self.lock();
        Ok(state
            .orders
            .values()
            .filter(|o| statuses.contains(&o.status))
            .map(|o| state.with_product(o))
            .collect())
    }

    async fn insert_order(&self, data: &OrderCreate) -> RepoResult<Order> {
        let mut state = self.lock();
        if !state
            .tickets
            .get(&data.ticket_id)
            .is_some_and(|t| t.status.is_active())
        {
            return Err(RepoError::Conflict(format!(
                "Ticket {} is paid or missing",
                data.ticket_id
            )));
        }
        let order = Order {
            id: state.next_id(),
            ticket_id: data.ticket_id,
            product_id: data.product_id,
            amount: data.amount,
            total_value: data.total_value,
            optionals: data.optionals.clone(),
            status: OrderStatus::Selected,
            created_at: 0,
        };
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn transition_order(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<bool> {
        let mut state = self.lock();
        match state.orders.get_mut(&id) {
            Some(order) if order.status == from => {
                order.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_orders_status(
        &self,
        ticket_id: i64,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> RepoResult<u64> {
        let mut state = self.lock();
        let mut moved = 0;
        for order in state.orders.values_mut() {
            if order.ticket_id == ticket_id && from.contains(&order.status) {
                order.status = to;
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn delete_selected_order(&self, id: i64) -> RepoResult<bool> {
        let mut state = self.lock();
        match state.orders.get(&id) {
            Some(order) if order.status == OrderStatus::Selected => {
                state.orders.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStores {
    async fn get_product(&self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self.lock().products.get(&id).cloned())
    }
}

#[async_trait]
impl PaymentStore for MemoryStores {
    async fn settle_ticket(
        &self,
        ticket_id: i64,
        expected_total: i64,
        total_value: i64,
        is_splitted: bool,
    ) -> RepoResult<(Ticket, Payment)> {
        let mut state = self.lock();
        let ticket = match state.tickets.get(&ticket_id) {
            Some(t) if t.status.is_active() => t.clone(),
            Some(_) => {
                return Err(RepoError::Duplicate(format!(
                    "Ticket {ticket_id} is already paid"
                )));
            }
            None => return Err(RepoError::NotFound(format!("Ticket {ticket_id}"))),
        };
        let lines = state.orders.values().filter(|o| o.ticket_id == ticket_id);
        let has_active = lines.clone().any(|o| o.status != OrderStatus::Delivered);
        let delivered: i64 = lines
            .filter(|o| o.status == OrderStatus::Delivered)
            .map(|o| o.total_value)
            .sum();
        if has_active || delivered != expected_total {
            return Err(RepoError::Conflict(format!(
                "Orders of ticket {ticket_id} changed during checkout"
            )));
        }
        let payment = Payment {
            id: state.next_id(),
            ticket_id,
            total_value,
            is_splitted,
            created_at: 0,
        };
        let paid = Ticket {
            status: TicketStatus::Paid,
            ..ticket
        };
        state.tickets.insert(ticket_id, paid.clone());
        state.payments.insert(ticket_id, payment.clone());
        Ok((paid, payment))
    }
}

#[async_trait]
impl ArchiveStore for MemoryStores {
    async fn append_finished_ticket(
        &self,
        ticket_id: i64,
        record: Map<String, Value>,
    ) -> RepoResult<()> {
        let mut state = self.lock();
        state.archive_attempts += 1;
        if state.archive_failures_left > 0 {
            state.archive_failures_left -= 1;
            return Err(RepoError::Database("archive unavailable".into()));
        }
        if state.archive.contains_key(&ticket_id) {
            return Err(RepoError::Duplicate(format!("Ticket {ticket_id}")));
        }
        state.archive.insert(ticket_id, record);
        Ok(())
    }

    async fn list_finished_tickets(&self) -> RepoResult<Vec<Map<String, Value>>> {
        Ok(self.lock().archive.values().cloned().collect())
    }
}

#[async_trait]
impl StaffCaller for MemoryStores {
    async fn request_staff_call(&self, user_id: i64, payer_name: &str) -> RepoResult<()> {
        let mut state = self.lock();
        state.staff_calls.push((user_id, payer_name.to_string()));
        if state.staff_calls_fail {
            return Err(RepoError::Database("waiter call table unavailable".into()));
        }
        Ok(())
    }
}
