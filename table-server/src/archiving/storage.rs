//! redb-based archive of finished tickets
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `finished_tickets` | `ticket_id` | JSON object | Write-once snapshot per paid ticket |
//!
//! Records are schema-less JSON objects; the typed snapshot lives in
//! `shared::models::FinishedTicketSnapshot`.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// key = ticket id, value = JSON-serialized record
const FINISHED_TICKETS_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("finished_tickets");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(i64),

    #[error("Record already archived: {0}")]
    AlreadyArchived(i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Finished ticket storage backed by redb
#[derive(Clone)]
pub struct ArchiveStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for ArchiveStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveStorage").finish_non_exhaustive()
    }
}

impl ArchiveStorage {
    /// Open or create the archive at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// In-memory archive for tests
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(FINISHED_TICKETS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Store a record under `ticket_id`; an existing key is never overwritten
    pub fn append(&self, ticket_id: i64, record: &Map<String, Value>) -> StorageResult<()> {
        let key = u64::try_from(ticket_id).map_err(|_| StorageError::InvalidKey(ticket_id))?;
        let bytes = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(FINISHED_TICKETS_TABLE)?;
            if table.get(key)?.is_some() {
                return Err(StorageError::AlreadyArchived(ticket_id));
            }
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up one record
    pub fn get(&self, ticket_id: i64) -> StorageResult<Option<Map<String, Value>>> {
        let Ok(key) = u64::try_from(ticket_id) else {
            return Ok(None);
        };
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FINISHED_TICKETS_TABLE)?;
        match table.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All records, ordered by ticket id
    pub fn list(&self) -> StorageResult<Vec<Map<String, Value>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FINISHED_TICKETS_TABLE)?;
        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_key, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }
}
