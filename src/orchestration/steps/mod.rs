//! Concrete de-provisioning steps.

pub mod avs_evaluation_removal;

pub use avs_evaluation_removal::AvsEvaluationRemovalStep;
