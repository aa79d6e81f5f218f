//! Finished ticket archive
//!
//! - **storage**: `ArchiveStorage`, the redb-backed write-once record store

pub mod storage;

pub use storage::{ArchiveStorage, StorageError, StorageResult};
