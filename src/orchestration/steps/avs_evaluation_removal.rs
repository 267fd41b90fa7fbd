//! # AVS Evaluation Removal Step
//!
//! Deletes the internal and then the external AVS evaluation of an environment
//! being de-provisioned. Internal goes first because the external evaluation
//! may reference it.
//!
//! Re-entering the step is safe: categories already recorded as deleted are
//! skipped by the delegator, and when both are deleted the step returns without
//! any delegation call.

use crate::avs::{DelegationClient, EvalAssistant};
use crate::constants::steps;
use crate::models::{DeprovisioningOperation, EvaluationCategory};
use crate::orchestration::operation_manager::DeprovisionOperationManager;
use crate::orchestration::retry_policy::RetryPolicy;
use crate::orchestration::step::{Step, StepOutcome};
use crate::storage::OperationStorage;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AvsEvaluationRemovalStep {
    delegator: Arc<dyn DelegationClient>,
    operation_manager: DeprovisionOperationManager,
    retry_policy: RetryPolicy,
}

impl AvsEvaluationRemovalStep {
    pub fn new(
        delegator: Arc<dyn DelegationClient>,
        storage: Arc<dyn OperationStorage>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            delegator,
            operation_manager: DeprovisionOperationManager::new(storage),
            retry_policy,
        }
    }
}

#[async_trait]
impl Step for AvsEvaluationRemovalStep {
    fn name(&self) -> &'static str {
        steps::AVS_EVALUATION_REMOVAL
    }

    #[instrument(skip_all, fields(step = steps::AVS_EVALUATION_REMOVAL, operation_id = %operation.operation_id))]
    async fn run(&self, operation: DeprovisioningOperation) -> StepOutcome {
        info!(avs = ?operation.avs, "Avs lifecycle");
        if operation.avs.all_deleted() {
            info!("Both internal and external evaluations have been deleted");
            return StepOutcome::Advance(operation);
        }

        let mut operation = operation;
        for category in EvaluationCategory::REMOVAL_ORDER {
            let assistant = EvalAssistant::for_category(category);
            match self.delegator.delete_evaluation(&operation, assistant).await {
                Ok(updated) => operation = updated,
                Err(error) => {
                    return self
                        .operation_manager
                        .retry_operation(
                            operation,
                            assistant.failure_cause(),
                            error,
                            &self.retry_policy,
                        )
                        .await;
                }
            }
        }

        StepOutcome::Advance(operation)
    }
}
