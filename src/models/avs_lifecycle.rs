//! # AVS Lifecycle State
//!
//! Tracks, per evaluation category, whether the monitoring evaluation created at
//! provisioning time has been removed.
//!
//! Deletion progress is monotonic: a category moves from `Pending` to `Deleted`
//! and there is no operation that moves it back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of AVS evaluation attached to a managed environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationCategory {
    /// Evaluation monitoring the environment from inside the platform
    Internal,
    /// Evaluation monitoring the environment from the outside
    External,
}

impl EvaluationCategory {
    /// Categories in the order they must be removed. The external evaluation may
    /// reference the internal one, so internal goes first.
    pub const REMOVAL_ORDER: [EvaluationCategory; 2] =
        [EvaluationCategory::Internal, EvaluationCategory::External];
}

impl fmt::Display for EvaluationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}

/// Deletion progress of a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionState {
    #[default]
    Pending,
    Deleted,
}

impl DeletionState {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Evaluation ids and deletion progress for both categories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvsLifecycle {
    /// Id of the internal evaluation, `0` when none was ever created
    pub internal_evaluation_id: i64,
    /// Id of the external evaluation, `0` when none was ever created
    pub external_evaluation_id: i64,
    internal: DeletionState,
    external: DeletionState,
}

impl AvsLifecycle {
    pub fn new(internal_evaluation_id: i64, external_evaluation_id: i64) -> Self {
        Self {
            internal_evaluation_id,
            external_evaluation_id,
            ..Self::default()
        }
    }

    pub fn state(&self, category: EvaluationCategory) -> DeletionState {
        match category {
            EvaluationCategory::Internal => self.internal,
            EvaluationCategory::External => self.external,
        }
    }

    pub fn is_deleted(&self, category: EvaluationCategory) -> bool {
        self.state(category).is_deleted()
    }

    /// Record that the evaluation of `category` no longer exists. Calling this
    /// for an already deleted category is a no-op.
    pub fn mark_deleted(&mut self, category: EvaluationCategory) {
        match category {
            EvaluationCategory::Internal => self.internal = DeletionState::Deleted,
            EvaluationCategory::External => self.external = DeletionState::Deleted,
        }
    }

    pub fn evaluation_id(&self, category: EvaluationCategory) -> i64 {
        match category {
            EvaluationCategory::Internal => self.internal_evaluation_id,
            EvaluationCategory::External => self.external_evaluation_id,
        }
    }

    /// True once every category has been removed
    pub fn all_deleted(&self) -> bool {
        EvaluationCategory::REMOVAL_ORDER
            .iter()
            .all(|category| self.is_deleted(*category))
    }
}
