//! # Orchestration Engine
//!
//! Step-based processing of de-provisioning operations.
//!
//! ## Core Components
//!
//! - **Step**: the contract every unit of idempotent work satisfies, returning a
//!   [`StepOutcome`] the driver interprets as advance, retry-after or fail
//! - **RetryPolicy**: fixed-interval, bounded retry window
//! - **DeprovisionOperationManager**: applies the retry policy to an operation and
//!   persists the charged retry time
//! - **DeprovisioningProcess**: sequential driver enforcing one execution per
//!   operation id at a time
//! - **steps**: concrete steps, such as AVS evaluation removal

pub mod operation_manager;
pub mod process;
pub mod retry_policy;
pub mod step;
pub mod steps;

pub use operation_manager::DeprovisionOperationManager;
pub use process::{DeprovisioningProcess, ProcessOutcome};
pub use retry_policy::{RetryDecision, RetryPolicy};
pub use step::{Step, StepOutcome};
pub use steps::AvsEvaluationRemovalStep;
