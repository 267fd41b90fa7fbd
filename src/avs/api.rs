//! Boundary to the external evaluation-management service.
//!
//! Only the two calls needed to tear down an evaluation are modelled; the
//! transport behind them belongs to the implementor.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvsApiError {
    /// The evaluation (or the parent reference) does not exist anymore
    #[error("Evaluation {evaluation_id} not found")]
    NotFound { evaluation_id: i64 },
    /// The service could not be reached or answered with a server error
    #[error("AVS unavailable: {0}")]
    Unavailable(String),
    /// The service refused the request
    #[error("AVS rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl AvsApiError {
    /// A missing evaluation means the deletion already happened
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[async_trait]
pub trait AvsApi: Send + Sync {
    /// Detach `evaluation_id` from the composite evaluation `parent_id`
    async fn remove_reference_from_parent_eval(
        &self,
        parent_id: i64,
        evaluation_id: i64,
    ) -> Result<(), AvsApiError>;

    async fn delete_evaluation(&self, evaluation_id: i64) -> Result<(), AvsApiError>;
}
