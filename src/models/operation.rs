//! # De-provisioning Operation Model
//!
//! The persisted record of one de-provisioning transaction.
//!
//! ## Overview
//!
//! A `DeprovisioningOperation` is created before the first step runs and is
//! read, modified and written back by every step invocation. Besides identity
//! and status it carries:
//!
//! - **AVS lifecycle**: per-category deletion progress (see [`AvsLifecycle`])
//! - **Retry bookkeeping**: time already spent retrying the current step, which
//!   must survive process restarts so the retry window is never reset by a crash
//!
//! Storage assigns `version` and `updated_at` on every save.

use crate::models::avs_lifecycle::AvsLifecycle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Processing state of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// Created, no step has run yet
    #[default]
    Pending,
    /// Steps are being executed
    InProgress,
    /// Every step completed
    Succeeded,
    /// A step exhausted its retry window
    Failed,
}

impl OperationState {
    /// Check if this is a terminal state (no further step invocations)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for OperationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid operation state: {s}")),
        }
    }
}

/// Budget of a step that was displaced while an earlier step re-ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepBudget {
    pub step: String,
    pub elapsed: Duration,
    pub attempts: u32,
}

/// Retry accounting for the step currently being executed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetryBookkeeping {
    /// Step the accounting belongs to
    pub step: Option<String>,
    /// Cumulative retry time charged to the current step
    pub elapsed: Duration,
    /// Number of retry decisions taken for the current step
    pub attempts: u32,
    /// Last failure recorded, kept after a reset for diagnostics
    pub last_error: Option<String>,
    /// Budgets of later steps, innermost last
    #[serde(default)]
    pub suspended: Vec<StepBudget>,
}

impl RetryBookkeeping {
    /// Clear elapsed time and attempts. `last_error` is preserved.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.attempts = 0;
    }

    /// Point the accounting at `step`.
    ///
    /// When it belonged to a different step, that step's budget is suspended
    /// and persisted with the operation. It comes back through
    /// [`leave_step`](Self::leave_step) once the step now running completes,
    /// even if that takes several retries and process restarts.
    pub fn enter_step(&mut self, step: &str) {
        if self.step.as_deref() == Some(step) {
            return;
        }
        if let Some(current) = self.step.take() {
            self.suspended.push(StepBudget {
                step: current,
                elapsed: self.elapsed,
                attempts: self.attempts,
            });
        }
        self.reset();
        self.step = Some(step.to_string());
    }

    /// Close the accounting of a step that completed
    pub fn leave_step(&mut self) {
        match self.suspended.pop() {
            Some(budget) => {
                self.step = Some(budget.step);
                self.elapsed = budget.elapsed;
                self.attempts = budget.attempts;
            }
            None => {
                self.reset();
                self.step = None;
            }
        }
    }
}

/// Persisted state of one de-provisioning transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprovisioningOperation {
    pub operation_id: Uuid,
    /// Service instance being de-provisioned
    pub instance_id: String,
    pub state: OperationState,
    /// Operator-facing status message
    pub description: String,
    pub avs: AvsLifecycle,
    pub retry: RetryBookkeeping,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeprovisioningOperation {
    pub fn new(instance_id: impl Into<String>, avs: AvsLifecycle) -> Self {
        let now = Utc::now();
        Self {
            operation_id: Uuid::new_v4(),
            instance_id: instance_id.into(),
            state: OperationState::Pending,
            description: "Operation created".to_string(),
            avs,
            retry: RetryBookkeeping::default(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_in_progress(&mut self) {
        if self.state == OperationState::Pending {
            self.state = OperationState::InProgress;
            self.description = "Operation in progress".to_string();
        }
    }

    pub fn mark_succeeded(&mut self) {
        self.state = OperationState::Succeeded;
        self.description = "Operation succeeded".to_string();
    }

    pub fn mark_failed(&mut self, description: impl Into<String>) {
        self.state = OperationState::Failed;
        self.description = description.into();
    }
}
