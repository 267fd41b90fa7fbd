//! # De-provisioning Process
//!
//! Minimal sequential driver: loads an operation fresh from storage, runs the
//! configured steps in order and persists after every step invocation.
//!
//! Steps are idempotent, so each execution starts from the first step; the ones
//! already satisfied return `Advance` without side effects. Execution is
//! single-writer per operation id: a concurrent `execute` for an id that is
//! already running is rejected rather than queued.
//!
//! Re-running a satisfied earlier step suspends the retry budget of the step
//! that was in progress; the budget is restored when the earlier step advances.

use crate::error::{DeprovisionerError, DeprovisionerResult};
use crate::models::{DeprovisioningOperation, OperationState};
use crate::orchestration::step::{Step, StepOutcome};
use crate::storage::OperationStorage;
use dashmap::DashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// What the caller should do with the operation after one execution
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Every step completed
    Succeeded,
    /// A step asked to be invoked again after the delay
    RetryAfter(Duration),
    /// A step exhausted its retries
    Failed(DeprovisionerError),
    /// The operation was already terminal; nothing ran
    Finished(OperationState),
}

pub struct DeprovisioningProcess {
    storage: Arc<dyn OperationStorage>,
    steps: Vec<Arc<dyn Step>>,
    in_flight: Arc<DashSet<Uuid>>,
}

impl std::fmt::Debug for DeprovisioningProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeprovisioningProcess")
            .field(
                "steps",
                &self.steps.iter().map(|step| step.name()).collect::<Vec<_>>(),
            )
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

/// Removes the operation id from the in-flight set when dropped
struct InFlightGuard {
    in_flight: Arc<DashSet<Uuid>>,
    operation_id: Uuid,
}

impl InFlightGuard {
    fn acquire(in_flight: &Arc<DashSet<Uuid>>, operation_id: Uuid) -> Option<Self> {
        in_flight.insert(operation_id).then(|| Self {
            in_flight: Arc::clone(in_flight),
            operation_id,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.operation_id);
    }
}

impl DeprovisioningProcess {
    pub fn new(storage: Arc<dyn OperationStorage>, steps: Vec<Arc<dyn Step>>) -> Self {
        Self {
            storage,
            steps,
            in_flight: Arc::new(DashSet::new()),
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    #[instrument(skip_all, fields(operation_id = %operation_id))]
    pub async fn execute(&self, operation_id: Uuid) -> DeprovisionerResult<ProcessOutcome> {
        let _guard = InFlightGuard::acquire(&self.in_flight, operation_id)
            .ok_or(DeprovisionerError::AlreadyRunning { operation_id })?;

        let mut operation = self.storage.get_operation(operation_id).await?;
        if operation.state.is_terminal() {
            debug!(state = %operation.state, "Operation already finished");
            return Ok(ProcessOutcome::Finished(operation.state));
        }
        if operation.state == OperationState::Pending {
            operation.mark_in_progress();
            operation = self.storage.save_operation(operation).await?;
        }

        for step in &self.steps {
            let step_name = step.name();
            operation.retry.enter_step(step_name);
            debug!(step = step_name, "Running step");

            match step.run(operation).await {
                StepOutcome::Advance(mut advanced) => {
                    advanced.retry.leave_step();
                    operation = self.storage.save_operation(advanced).await?;
                    debug!(step = step_name, "Step completed");
                }
                StepOutcome::RetryAfter(pending, wait) => {
                    self.storage.save_operation(pending).await?;
                    info!(
                        step = step_name,
                        wait_secs = wait.as_secs(),
                        "Step scheduled for retry"
                    );
                    return Ok(ProcessOutcome::RetryAfter(wait));
                }
                StepOutcome::Fail(failed, cause) => {
                    self.fail(failed, step_name, &cause).await?;
                    return Ok(ProcessOutcome::Failed(cause));
                }
            }
        }

        operation.mark_succeeded();
        self.storage.save_operation(operation).await?;
        info!("Operation succeeded");
        Ok(ProcessOutcome::Succeeded)
    }

    async fn fail(
        &self,
        mut operation: DeprovisioningOperation,
        step_name: &str,
        cause: &DeprovisionerError,
    ) -> DeprovisionerResult<()> {
        if operation.state != OperationState::Failed {
            operation.mark_failed(format!("step {step_name} failed: {cause}"));
        }
        error!(
            step = step_name,
            description = %operation.description,
            "Operation failed"
        );
        self.storage.save_operation(operation).await?;
        Ok(())
    }
}
