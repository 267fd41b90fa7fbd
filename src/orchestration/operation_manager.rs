//! # De-provisioning Operation Manager
//!
//! Shared helper steps use to turn a failure into a scheduling instruction.
//! It knows nothing about what a step does, only about elapsed-time accounting
//! and persisting the operation.

use crate::error::DeprovisionerError;
use crate::models::DeprovisioningOperation;
use crate::orchestration::retry_policy::{RetryDecision, RetryPolicy};
use crate::orchestration::step::StepOutcome;
use crate::storage::OperationStorage;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub struct DeprovisionOperationManager {
    storage: Arc<dyn OperationStorage>,
}

impl std::fmt::Debug for DeprovisionOperationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeprovisionOperationManager").finish()
    }
}

impl DeprovisionOperationManager {
    pub fn new(storage: Arc<dyn OperationStorage>) -> Self {
        Self { storage }
    }

    /// Charge one retry interval to `operation` and decide between a scheduled
    /// retry and terminal failure.
    ///
    /// The charged time is persisted either way, so a restart resumes with the
    /// budget already spent. A scheduled retry carries no error.
    pub async fn retry_operation(
        &self,
        mut operation: DeprovisioningOperation,
        cause: &str,
        err: impl Into<DeprovisionerError>,
        policy: &RetryPolicy,
    ) -> StepOutcome {
        let err = err.into();
        let decision = policy.decide(operation.retry.elapsed);

        operation.retry.elapsed = policy.charge(operation.retry.elapsed);
        operation.retry.attempts += 1;
        operation.retry.last_error = Some(format!("{cause}: {err}"));

        match decision {
            RetryDecision::RetryAfter(wait) => {
                warn!(
                    operation_id = %operation.operation_id,
                    elapsed_secs = operation.retry.elapsed.as_secs(),
                    wait_secs = wait.as_secs(),
                    attempts = operation.retry.attempts,
                    error = %err,
                    "{cause}, retrying"
                );
                let operation = self.update_operation(operation).await;
                StepOutcome::RetryAfter(operation, wait)
            }
            RetryDecision::Abandon => {
                error!(
                    operation_id = %operation.operation_id,
                    elapsed_secs = operation.retry.elapsed.as_secs(),
                    max_window_secs = policy.max_window().as_secs(),
                    error = %err,
                    "{cause}, retry window exhausted"
                );
                operation.mark_failed(format!("{cause}: {err}"));
                let operation = self.update_operation(operation).await;
                StepOutcome::Fail(operation, err)
            }
        }
    }

    /// Persist `operation`, falling back to the in-memory copy when storage
    /// fails. The driver persists again after every invocation.
    pub async fn update_operation(
        &self,
        operation: DeprovisioningOperation,
    ) -> DeprovisioningOperation {
        match self.storage.save_operation(operation.clone()).await {
            Ok(saved) => saved,
            Err(save_error) => {
                error!(
                    operation_id = %operation.operation_id,
                    error = %save_error,
                    "Unable to persist operation"
                );
                operation
            }
        }
    }
}
