//! redb-backed archive store
//!
//! redb operations are synchronous; records are small and written once per ticket.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ArchiveStore;
use crate::archiving::{ArchiveStorage, StorageError};
use crate::db::repository::{RepoError, RepoResult};

#[derive(Clone, Debug)]
pub struct RedbArchive {
    storage: ArchiveStorage,
}

impl RedbArchive {
    pub fn new(storage: ArchiveStorage) -> Self {
        Self { storage }
    }
}

impl From<StorageError> for RepoError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AlreadyArchived(id) => {
                RepoError::Duplicate(format!("Ticket {id} already archived"))
            }
            StorageError::InvalidKey(id) => RepoError::Validation(format!("Invalid ticket id {id}")),
            other => RepoError::Database(other.to_string()),
        }
    }
}

#[async_trait]
impl ArchiveStore for RedbArchive {
    async fn append_finished_ticket(
        &self,
        ticket_id: i64,
        record: Map<String, Value>,
    ) -> RepoResult<()> {
        self.storage.append(ticket_id, &record)?;
        Ok(())
    }

    async fn list_finished_tickets(&self) -> RepoResult<Vec<Map<String, Value>>> {
        Ok(self.storage.list()?)
    }
}
