pub mod avs_lifecycle;
pub mod operation;

// Re-export core models for easy access
pub use avs_lifecycle::{AvsLifecycle, DeletionState, EvaluationCategory};
pub use operation::{DeprovisioningOperation, OperationState, RetryBookkeeping, StepBudget};
