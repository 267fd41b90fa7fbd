//! # Operation Storage
//!
//! Persistence boundary for [`DeprovisioningOperation`] records.
//!
//! Saves are last-write-wins per operation id: storage bumps `version` and
//! stamps `updated_at`, then returns the persisted copy, which callers should
//! adopt as their new baseline.

pub mod in_memory;

use crate::models::DeprovisioningOperation;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use in_memory::InMemoryOperationStorage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Operation {operation_id} not found")]
    NotFound { operation_id: Uuid },
    #[error("Operation {operation_id} already exists")]
    AlreadyExists { operation_id: Uuid },
    /// Backend could not be reached; the write may be retried
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Load/save access to operation records
#[async_trait]
pub trait OperationStorage: Send + Sync {
    /// Store a newly created operation
    async fn insert_operation(
        &self,
        operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation>;

    /// Read the latest persisted copy of an operation
    async fn get_operation(&self, operation_id: Uuid) -> StorageResult<DeprovisioningOperation>;

    /// Overwrite the stored copy and return what was persisted
    async fn save_operation(
        &self,
        operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation>;
}
