use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::checkout::RetryPolicy;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Directory holding the SQLite and redb files |
/// | HTTP_PORT | 4000 | HTTP listen port |
/// | DATABASE_FILE | table_order.db | SQLite file inside WORK_DIR |
/// | ARCHIVE_FILE | finished_tickets.redb | redb archive inside WORK_DIR |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | Log level when RUST_LOG is unset |
/// | LOG_DIR | (unset) | Directory for daily rolling log files |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout |
/// | FOLLOW_UP_QUEUE_CAPACITY | 256 | Pending post-checkout side effects |
/// | ARCHIVE_MAX_RETRIES | 3 | Archive attempts per paid ticket |
/// | ARCHIVE_RETRY_BASE_DELAY_MS | 500 | Backoff base between archive attempts |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/table HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub database_file: String,
    pub archive_file: String,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub request_timeout_ms: u64,
    pub follow_up_queue_capacity: usize,
    pub archive_max_retries: u32,
    pub archive_retry_base_delay_ms: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_or("HTTP_PORT", 4000),
            database_file: std::env::var("DATABASE_FILE")
                .unwrap_or_else(|_| "table_order.db".into()),
            archive_file: std::env::var("ARCHIVE_FILE")
                .unwrap_or_else(|_| "finished_tickets.redb".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            // a zero-capacity channel panics
            follow_up_queue_capacity: env_or("FOLLOW_UP_QUEUE_CAPACITY", 256).max(1),
            archive_max_retries: env_or("ARCHIVE_MAX_RETRIES", 3),
            archive_retry_base_delay_ms: env_or("ARCHIVE_RETRY_BASE_DELAY_MS", 500),
        }
    }

    /// Environment config with the data directory replaced
    ///
    /// Used by tests
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }

    pub fn archive_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.archive_file)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn archive_retry(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.archive_max_retries.max(1),
            base_delay: Duration::from_millis(self.archive_retry_base_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
