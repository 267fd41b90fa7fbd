#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Deprovisioner Core
//!
//! Step-based processor for long-running de-provisioning operations.
//!
//! ## Overview
//!
//! A de-provisioning operation is driven through a list of steps. Each step
//! delegates work to an external system, records completion on the persisted
//! operation record and reports back one of three outcomes: advance, retry
//! after a delay, or fail. Steps are re-entered after crashes and scheduled
//! retries, so every step is idempotent and the retry budget lives on the
//! operation record rather than in process memory.
//!
//! ## Module Organization
//!
//! - [`models`] - Operation record, AVS lifecycle state and retry bookkeeping
//! - [`storage`] - Operation persistence boundary and in-memory implementation
//! - [`avs`] - AVS API boundary, evaluation assistants and the delegator
//! - [`orchestration`] - Step contract, retry policy, steps and driver
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deprovisioner_core::avs::{AvsApi, Delegator};
//! use deprovisioner_core::config::ConfigManager;
//! use deprovisioner_core::models::{AvsLifecycle, DeprovisioningOperation};
//! use deprovisioner_core::orchestration::{AvsEvaluationRemovalStep, DeprovisioningProcess, Step};
//! use deprovisioner_core::storage::{InMemoryOperationStorage, OperationStorage};
//! use std::sync::Arc;
//!
//! # async fn example(avs_api: Arc<dyn AvsApi>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::load()?;
//! let storage = Arc::new(InMemoryOperationStorage::new());
//!
//! let delegator = Arc::new(Delegator::new(avs_api, storage.clone(), config.config().avs.clone()));
//! let policy = config.config().retry.policy()?;
//! let step = AvsEvaluationRemovalStep::new(delegator, storage.clone(), policy);
//! let steps: Vec<Arc<dyn Step>> = vec![Arc::new(step)];
//! let process = DeprovisioningProcess::new(storage.clone(), steps);
//!
//! let operation = storage
//!     .insert_operation(DeprovisioningOperation::new("instance-1", AvsLifecycle::new(101, 102)))
//!     .await?;
//! let outcome = process.execute(operation.operation_id).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod avs;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod storage;

pub use config::{AvsConfig, ConfigManager, DeprovisionerConfig, RetryConfig};
pub use error::{DeprovisionerError, DeprovisionerResult};
pub use models::{
    AvsLifecycle, DeletionState, DeprovisioningOperation, EvaluationCategory, OperationState,
};
pub use orchestration::{
    AvsEvaluationRemovalStep, DeprovisionOperationManager, DeprovisioningProcess, RetryPolicy,
    Step, StepOutcome,
};
pub use storage::{InMemoryOperationStorage, OperationStorage};
