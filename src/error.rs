//! Error types for the de-provisioning processor.

use crate::avs::DelegationError;
use crate::config::ConfigurationError;
use crate::storage::StorageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeprovisionerError {
    #[error("Delegation error: {0}")]
    Delegation(#[from] DelegationError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Operation {operation_id} is already being processed")]
    AlreadyRunning { operation_id: Uuid },
}

impl From<ConfigurationError> for DeprovisionerError {
    fn from(error: ConfigurationError) -> Self {
        DeprovisionerError::Configuration(error.to_string())
    }
}

pub type DeprovisionerResult<T> = anyhow::Result<T, DeprovisionerError>;
