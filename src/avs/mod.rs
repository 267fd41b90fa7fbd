//! # AVS Evaluation Removal
//!
//! Everything needed to delete the monitoring evaluations attached to an
//! environment: the external API boundary, the per-category assistants and the
//! delegator that ties them to the operation record.

pub mod api;
pub mod assistant;
pub mod delegator;

pub use api::{AvsApi, AvsApiError};
pub use assistant::EvalAssistant;
pub use delegator::{DelegationClient, DelegationError, Delegator};
