//! Shared setup for integration tests: real SQLite + redb in a temp dir

#![allow(dead_code)]

use std::time::Duration;

use shared::models::{CallerContext, Order, OrderCreate, Role};
use table_server::archiving::ArchiveStorage;
use table_server::db::DbService;
use table_server::db::repository::{product, session, user};
use table_server::{Config, ServerState};
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub state: ServerState,
    pub archive: ArchiveStorage,
    pub worker: JoinHandle<()>,
    // dropped last so the files outlive the pool
    pub dir: TempDir,
}

pub struct Seeded {
    pub id: i64,
    pub name: String,
    pub token: String,
}

impl Seeded {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl TestServer {
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::with_work_dir(dir.path().to_string_lossy().to_string());
        config.archive_retry_base_delay_ms = 1;

        let db = DbService::new(&config.database_path().to_string_lossy())
            .await
            .unwrap();
        let archive = ArchiveStorage::open(config.archive_path()).unwrap();
        let (state, worker) = ServerState::from_parts(config, db, archive.clone());
        Self {
            state,
            archive,
            worker,
            dir,
        }
    }

    pub async fn user(&self, name: &str, role: Role) -> Seeded {
        let pool = &self.state.db.pool;
        let u = user::create(pool, name, role).await.unwrap();
        let token = format!("token-{}-{}", name.to_lowercase(), u.id);
        session::create(pool, &token, u.id).await.unwrap();
        Seeded {
            id: u.id,
            name: u.name,
            token,
        }
    }

    pub async fn product(&self, name: &str, price: i64) -> i64 {
        product::create(
            &self.state.db.pool,
            product::ProductCreate {
                name: name.into(),
                description: None,
                image: None,
                price,
            },
        )
        .await
        .unwrap()
        .id
    }

    /// Open a ticket for `client` holding one DELIVERED line worth `total`
    pub async fn delivered_ticket(&self, client: &Seeded, admin: &Seeded, total: i64) -> i64 {
        let caller = CallerContext::client(client.id);
        let (ticket, _) = self.state.tickets.open_for(&caller).await.unwrap();
        let product_id = self.product("Pizza", total).await;
        let order = self
            .add(&caller, ticket.id, product_id, total)
            .await;
        let staff = CallerContext::admin(admin.id);
        self.state
            .orders
            .start_preparing(&staff, order.id)
            .await
            .unwrap();
        self.state.orders.deliver(&staff, order.id).await.unwrap();
        ticket.id
    }

    pub async fn add(
        &self,
        caller: &CallerContext,
        ticket_id: i64,
        product_id: i64,
        total_value: i64,
    ) -> Order {
        self.state
            .orders
            .add_order(
                caller,
                OrderCreate {
                    ticket_id,
                    product_id,
                    amount: 1,
                    total_value,
                    optionals: None,
                },
            )
            .await
            .unwrap()
    }

    /// Drop every service handle and wait for queued follow-ups
    pub async fn drain(self) -> (ArchiveStorage, TempDir, sqlx::SqlitePool) {
        let pool = self.state.db.pool.clone();
        drop(self.state);
        tokio::time::timeout(Duration::from_secs(5), self.worker)
            .await
            .expect("follow-up worker did not drain")
            .unwrap();
        (self.archive, self.dir, pool)
    }
}
