//! Ticket service
//!
//! A ticket is one table session. Signing in opens one; paying closes it.

use std::sync::Arc;

use shared::models::{CallerContext, Ticket};

use crate::db::repository::RepoError;
use crate::stores::TicketStore;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
}

impl TicketService {
    pub fn new(tickets: Arc<dyn TicketStore>) -> Self {
        Self { tickets }
    }

    /// Return the caller's active ticket, creating a RESERVED one if none exists
    ///
    /// The boolean is true when a ticket was created.
    pub async fn open_for(&self, caller: &CallerContext) -> AppResult<(Ticket, bool)> {
        if let Some(ticket) = self.tickets.find_active_ticket(caller.user_id).await? {
            return Ok((ticket, false));
        }

        match self.tickets.create_ticket(caller.user_id).await {
            Ok(ticket) => {
                tracing::info!(ticket_id = ticket.id, user_id = caller.user_id, "Ticket opened");
                Ok((ticket, true))
            }
            // lost a race against a concurrent sign-in of the same user
            Err(RepoError::Duplicate(_)) => {
                let ticket = self
                    .tickets
                    .find_active_ticket(caller.user_id)
                    .await?
                    .ok_or_else(|| AppError::internal("Active ticket vanished after conflict"))?;
                Ok((ticket, false))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::PaymentStore;
    use crate::stores::memory::MemoryStores;
    use shared::models::TicketStatus;

    #[tokio::test]
    async fn test_open_for_reuses_active_ticket() {
        let stores = MemoryStores::new();
        let svc = TicketService::new(Arc::new(stores.clone()));
        let caller = CallerContext::client(3);

        let (first, created) = svc.open_for(&caller).await.unwrap();
        assert!(created);
        assert_eq!(first.status, TicketStatus::Reserved);

        let (second, created) = svc.open_for(&caller).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_open_for_after_payment_creates_new_ticket() {
        let stores = MemoryStores::new();
        let svc = TicketService::new(Arc::new(stores.clone()));
        let caller = CallerContext::client(3);

        let (first, _) = svc.open_for(&caller).await.unwrap();
        stores.settle_ticket(first.id, 0, 100, false).await.unwrap();

        let (next, created) = svc.open_for(&caller).await.unwrap();
        assert!(created);
        assert_ne!(next.id, first.id);
    }
}
