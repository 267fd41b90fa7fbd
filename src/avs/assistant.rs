//! # Evaluation Assistants
//!
//! Capability descriptors selecting which evaluation category a delegation call
//! targets. The set of categories is fixed, so the assistant is a closed enum
//! rather than a trait object.

use crate::config::AvsConfig;
use crate::models::{AvsLifecycle, EvaluationCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalAssistant {
    Internal,
    External,
}

impl EvalAssistant {
    pub fn for_category(category: EvaluationCategory) -> Self {
        match category {
            EvaluationCategory::Internal => Self::Internal,
            EvaluationCategory::External => Self::External,
        }
    }

    pub fn category(&self) -> EvaluationCategory {
        match self {
            Self::Internal => EvaluationCategory::Internal,
            Self::External => EvaluationCategory::External,
        }
    }

    pub fn is_already_deleted(&self, lifecycle: &AvsLifecycle) -> bool {
        lifecycle.is_deleted(self.category())
    }

    pub fn evaluation_id(&self, lifecycle: &AvsLifecycle) -> i64 {
        lifecycle.evaluation_id(self.category())
    }

    /// An evaluation id of zero means provisioning never created the evaluation
    pub fn is_valid(&self, lifecycle: &AvsLifecycle) -> bool {
        self.evaluation_id(lifecycle) != 0
    }

    /// Composite evaluation the category's evaluations are attached to
    pub fn parent_id(&self, config: &AvsConfig) -> i64 {
        match self {
            Self::Internal => config.internal_parent_id,
            Self::External => config.external_parent_id,
        }
    }

    pub fn set_deleted(&self, lifecycle: &mut AvsLifecycle) {
        lifecycle.mark_deleted(self.category());
    }

    /// Cause attached to retries when this category's deletion fails
    pub fn failure_cause(&self) -> &'static str {
        match self {
            Self::Internal => "error while deleting avs internal evaluation",
            Self::External => "error while deleting avs external evaluation",
        }
    }
}
