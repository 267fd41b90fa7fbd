//! # Evaluation Delegator
//!
//! Removes one category of AVS evaluation on behalf of a step and records the
//! completion on the operation record.
//!
//! ## Contract
//!
//! - Already deleted categories return the operation untouched, with no API call
//! - Categories whose evaluation was never created are marked deleted without
//!   an API call
//! - `NotFound` from the API counts as success, so a call repeated after a
//!   partial attempt is safe
//! - On success the category is marked deleted and the operation is persisted
//!   before returning
//! - On failure the caller's operation is left as it was

use crate::avs::api::{AvsApi, AvsApiError};
use crate::avs::assistant::EvalAssistant;
use crate::config::AvsConfig;
use crate::models::DeprovisioningOperation;
use crate::storage::{OperationStorage, StorageError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DelegationError {
    #[error("AVS call failed for evaluation {evaluation_id}: {source}")]
    Api {
        evaluation_id: i64,
        #[source]
        source: AvsApiError,
    },
    #[error("Failed to persist deletion progress: {0}")]
    Storage(#[from] StorageError),
}

/// Performs the external deletion for the category selected by `assistant`
#[async_trait]
pub trait DelegationClient: Send + Sync {
    async fn delete_evaluation(
        &self,
        operation: &DeprovisioningOperation,
        assistant: EvalAssistant,
    ) -> Result<DeprovisioningOperation, DelegationError>;
}

pub struct Delegator {
    client: Arc<dyn AvsApi>,
    storage: Arc<dyn OperationStorage>,
    config: AvsConfig,
}

impl std::fmt::Debug for Delegator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegator")
            .field("config", &self.config)
            .finish()
    }
}

impl Delegator {
    pub fn new(
        client: Arc<dyn AvsApi>,
        storage: Arc<dyn OperationStorage>,
        config: AvsConfig,
    ) -> Self {
        Self {
            client,
            storage,
            config,
        }
    }

    async fn try_deleting(
        &self,
        assistant: EvalAssistant,
        evaluation_id: i64,
    ) -> Result<(), DelegationError> {
        let parent_id = assistant.parent_id(&self.config);

        ignore_not_found(
            self.client
                .remove_reference_from_parent_eval(parent_id, evaluation_id)
                .await,
        )
        .map_err(|source| DelegationError::Api {
            evaluation_id,
            source,
        })?;

        ignore_not_found(self.client.delete_evaluation(evaluation_id).await).map_err(|source| {
            DelegationError::Api {
                evaluation_id,
                source,
            }
        })
    }
}

fn ignore_not_found(result: Result<(), AvsApiError>) -> Result<(), AvsApiError> {
    match result {
        Err(error) if error.is_not_found() => {
            debug!(error = %error, "Evaluation already gone, treating as deleted");
            Ok(())
        }
        other => other,
    }
}

#[async_trait]
impl DelegationClient for Delegator {
    #[instrument(skip_all, fields(operation_id = %operation.operation_id, category = %assistant.category()))]
    async fn delete_evaluation(
        &self,
        operation: &DeprovisioningOperation,
        assistant: EvalAssistant,
    ) -> Result<DeprovisioningOperation, DelegationError> {
        if assistant.is_already_deleted(&operation.avs) {
            info!("Evaluation has been deleted previously");
            return Ok(operation.clone());
        }

        if assistant.is_valid(&operation.avs) {
            let evaluation_id = assistant.evaluation_id(&operation.avs);
            self.try_deleting(assistant, evaluation_id).await?;
            info!(evaluation_id, "Evaluation deleted");
        } else {
            info!("No evaluation was created, nothing to delete");
        }

        let mut updated = operation.clone();
        assistant.set_deleted(&mut updated.avs);
        Ok(self.storage.save_operation(updated).await?)
    }
}
