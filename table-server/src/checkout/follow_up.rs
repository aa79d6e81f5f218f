//! Follow-up worker for settled tickets
//!
//! Runs the side effects of a successful checkout after the payment is
//! committed: the staff call for split bills and the archive write. Failures
//! are logged here and never reach the paying client.

use std::sync::Arc;
use std::time::Duration;

use shared::models::FinishedTicketSnapshot;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::db::repository::RepoError;
use crate::stores::{ArchiveStore, StaffCaller};

/// Concurrent follow-ups in flight
const FOLLOW_UP_CONCURRENCY: usize = 8;
/// Backoff cap between archive attempts
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Work item sent by the checkout engine after a payment commits
#[derive(Debug, Clone)]
pub struct SettlementEvent {
    pub snapshot: FinishedTicketSnapshot,
    /// Bill divided among several payers; staff is summoned to the table
    pub split: bool,
}

/// Archive retry policy
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, at least one
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Exponential backoff after the given failed attempt (0-based): base * 2^attempt, capped
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(RETRY_MAX_DELAY)
    }
}

pub struct FollowUpWorker {
    staff: Arc<dyn StaffCaller>,
    archive: Arc<dyn ArchiveStore>,
    retry: RetryPolicy,
    semaphore: Arc<Semaphore>,
}

impl FollowUpWorker {
    pub fn new(staff: Arc<dyn StaffCaller>, archive: Arc<dyn ArchiveStore>, retry: RetryPolicy) -> Self {
        Self {
            staff,
            archive,
            retry,
            semaphore: Arc::new(Semaphore::new(FOLLOW_UP_CONCURRENCY)),
        }
    }

    /// Process events until every sender is dropped, then drain in-flight work
    pub async fn run(self, mut event_rx: mpsc::Receiver<SettlementEvent>) {
        tracing::info!(concurrency = FOLLOW_UP_CONCURRENCY, "FollowUpWorker started");

        let worker = Arc::new(self);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    tracing::debug!(ticket_id = event.snapshot.ticket_id, split = event.split, "Received settlement");
                    let w = worker.clone();
                    in_flight.spawn(async move {
                        let Ok(_permit) = w.semaphore.acquire().await else {
                            return;
                        };
                        w.handle(event).await;
                    });
                }
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Follow-up task panicked");
                    }
                }
            }
        }

        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Follow-up task panicked");
            }
        }
        tracing::info!("Settlement channel closed, FollowUpWorker stopped");
    }

    async fn handle(&self, event: SettlementEvent) {
        let ticket_id = event.snapshot.ticket_id;

        if event.split {
            let user_id = event.snapshot.user_id;
            match self
                .staff
                .request_staff_call(user_id, &event.snapshot.payer_name)
                .await
            {
                Ok(()) => tracing::info!(ticket_id, user_id, "Staff called for split payment"),
                Err(e) => tracing::error!(ticket_id, user_id, error = %e, "Staff call failed"),
            }
        }

        self.archive_with_retry(&event.snapshot).await;
    }

    async fn archive_with_retry(&self, snapshot: &FinishedTicketSnapshot) {
        let ticket_id = snapshot.ticket_id;
        let record = match snapshot.to_record() {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(ticket_id, error = %e, "Snapshot serialization failed, not archived");
                return;
            }
        };

        let attempts = self.retry.max_attempts.max(1);
        for attempt in 0..attempts {
            match self
                .archive
                .append_finished_ticket(ticket_id, record.clone())
                .await
            {
                Ok(()) => {
                    tracing::info!(ticket_id, "Finished ticket archived");
                    return;
                }
                Err(RepoError::Duplicate(_)) => {
                    tracing::info!(ticket_id, "Finished ticket already archived, skipping");
                    return;
                }
                Err(e) => {
                    tracing::error!(ticket_id, error = %e, attempt = attempt + 1, "Archive failed");
                    if attempt + 1 < attempts {
                        let delay = self.retry.delay_after(attempt);
                        tracing::warn!(ticket_id, delay_ms = delay.as_millis() as u64, "Retrying...");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        tracing::error!(ticket_id, attempts, "Giving up on archive, payment stays recorded");
    }
}
