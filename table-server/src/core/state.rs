use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::archiving::ArchiveStorage;
use crate::checkout::{CheckoutEngine, FollowUpWorker};
use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::stores::{RedbArchive, SqliteStores};
use crate::tickets::TicketService;
use crate::utils::AppError;

/// Server state, cloned into every handler
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Configuration (immutable) |
/// | db | DbService | SQLite pool (sessions, repositories) |
/// | tickets | TicketService | Opening table sessions |
/// | orders | OrderService | Cart and kitchen operations |
/// | checkout | CheckoutEngine | Bulk moves and pay-and-close |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub tickets: TicketService,
    pub orders: OrderService,
    pub checkout: CheckoutEngine,
}

impl ServerState {
    /// Open the stores under `config.work_dir` and start the follow-up worker
    ///
    /// The returned handle finishes once every clone of the state is dropped
    /// and queued follow-ups are done.
    pub async fn initialize(config: &Config) -> Result<(Self, JoinHandle<()>), AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!("Failed to create work dir {}: {e}", config.work_dir))
        })?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let archive_path = config.archive_path();
        let archive = ArchiveStorage::open(&archive_path)
            .map_err(|e| AppError::internal(format!("Failed to open archive: {e}")))?;
        tracing::info!(path = %archive_path.display(), "Archive store opened");

        Ok(Self::from_parts(config.clone(), db, archive))
    }

    /// Wire services over already opened stores
    pub fn from_parts(
        config: Config,
        db: DbService,
        archive: ArchiveStorage,
    ) -> (Self, JoinHandle<()>) {
        let sql = Arc::new(SqliteStores::new(db.pool.clone()));
        let archive = Arc::new(RedbArchive::new(archive));

        let (follow_up_tx, follow_up_rx) = mpsc::channel(config.follow_up_queue_capacity.max(1));
        let worker = FollowUpWorker::new(sql.clone(), archive.clone(), config.archive_retry());
        let handle = tokio::spawn(worker.run(follow_up_rx));

        let state = Self {
            tickets: TicketService::new(sql.clone()),
            orders: OrderService::new(sql.clone(), sql.clone(), sql.clone()),
            checkout: CheckoutEngine::new(sql.clone(), sql.clone(), sql, archive, follow_up_tx),
            config,
            db,
        };
        (state, handle)
    }
}
