//! # Step Contract
//!
//! A step is one unit of idempotent work the driver invokes repeatedly until it
//! reports completion or terminal failure. It never sleeps in-process: a retry
//! is requested by returning [`StepOutcome::RetryAfter`].
//!
//! | outcome      | wait     | error  | driver action      |
//! |--------------|----------|--------|--------------------|
//! | `Advance`    | 0        | none   | run the next step  |
//! | `RetryAfter` | interval | none   | run again later    |
//! | `Fail`       | 0        | cause  | fail the operation |

use crate::error::DeprovisionerError;
use crate::models::DeprovisioningOperation;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Step: Send + Sync {
    /// Stable identifier used in logs and retry bookkeeping
    fn name(&self) -> &'static str;

    async fn run(&self, operation: DeprovisioningOperation) -> StepOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The step is satisfied and the pipeline may move on
    Advance(DeprovisioningOperation),
    /// Transient failure, invoke the step again after the wait
    RetryAfter(DeprovisioningOperation, Duration),
    /// Retries are exhausted; the operation has failed
    Fail(DeprovisioningOperation, DeprovisionerError),
}

impl StepOutcome {
    pub fn operation(&self) -> &DeprovisioningOperation {
        match self {
            Self::Advance(operation)
            | Self::RetryAfter(operation, _)
            | Self::Fail(operation, _) => operation,
        }
    }

    pub fn into_operation(self) -> DeprovisioningOperation {
        match self {
            Self::Advance(operation)
            | Self::RetryAfter(operation, _)
            | Self::Fail(operation, _) => operation,
        }
    }

    /// Delay before the next invocation, zero unless a retry is scheduled
    pub fn wait(&self) -> Duration {
        match self {
            Self::RetryAfter(_, wait) => *wait,
            Self::Advance(_) | Self::Fail(_, _) => Duration::ZERO,
        }
    }

    pub fn error(&self) -> Option<&DeprovisionerError> {
        match self {
            Self::Fail(_, error) => Some(error),
            Self::Advance(_) | Self::RetryAfter(_, _) => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Advance(_))
    }
}
