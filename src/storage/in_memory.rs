//! In-process operation storage backed by a concurrent map.

use super::{OperationStorage, StorageError, StorageResult};
use crate::models::DeprovisioningOperation;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InMemoryOperationStorage {
    operations: Arc<DashMap<Uuid, DeprovisioningOperation>>,
}

impl InMemoryOperationStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[async_trait]
impl OperationStorage for InMemoryOperationStorage {
    async fn insert_operation(
        &self,
        mut operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation> {
        let operation_id = operation.operation_id;
        match self.operations.entry(operation_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(StorageError::AlreadyExists { operation_id })
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                operation.version = 1;
                operation.updated_at = Utc::now();
                slot.insert(operation.clone());
                debug!(operation_id = %operation_id, "Operation inserted");
                Ok(operation)
            }
        }
    }

    async fn get_operation(&self, operation_id: Uuid) -> StorageResult<DeprovisioningOperation> {
        self.operations
            .get(&operation_id)
            .map(|entry| entry.value().clone())
            .ok_or(StorageError::NotFound { operation_id })
    }

    async fn save_operation(
        &self,
        mut operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation> {
        let operation_id = operation.operation_id;
        let mut entry = self
            .operations
            .get_mut(&operation_id)
            .ok_or(StorageError::NotFound { operation_id })?;

        operation.version = entry.version + 1;
        operation.updated_at = Utc::now();
        *entry = operation.clone();

        debug!(
            operation_id = %operation_id,
            version = operation.version,
            state = %operation.state,
            "Operation saved"
        );
        Ok(operation)
    }
}
