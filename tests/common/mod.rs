//! Shared fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use deprovisioner_core::avs::{AvsApi, AvsApiError, Delegator};
use deprovisioner_core::config::AvsConfig;
use deprovisioner_core::models::{AvsLifecycle, DeprovisioningOperation};
use deprovisioner_core::orchestration::{
    AvsEvaluationRemovalStep, DeprovisioningProcess, RetryPolicy, Step,
};
use deprovisioner_core::storage::{
    InMemoryOperationStorage, OperationStorage, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const INTERNAL_EVALUATION_ID: i64 = 101;
pub const EXTERNAL_EVALUATION_ID: i64 = 202;
pub const INTERNAL_PARENT_ID: i64 = 9001;
pub const EXTERNAL_PARENT_ID: i64 = 9002;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvsCall {
    RemoveReference { parent_id: i64, evaluation_id: i64 },
    Delete { evaluation_id: i64 },
}

impl AvsCall {
    pub fn evaluation_id(&self) -> i64 {
        match self {
            Self::RemoveReference { evaluation_id, .. } | Self::Delete { evaluation_id } => {
                *evaluation_id
            }
        }
    }
}

/// AVS double recording every call; evaluations can be scripted to fail
#[derive(Debug, Default)]
pub struct MockAvsApi {
    calls: Mutex<Vec<AvsCall>>,
    failures: Mutex<HashMap<i64, AvsApiError>>,
}

impl MockAvsApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_evaluation(&self, evaluation_id: i64, error: AvsApiError) {
        self.failures.lock().unwrap().insert(evaluation_id, error);
    }

    pub fn recover_evaluation(&self, evaluation_id: i64) {
        self.failures.lock().unwrap().remove(&evaluation_id);
    }

    pub fn calls(&self) -> Vec<AvsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Evaluation ids touched, in call order, without duplicates in a row
    pub fn touched_evaluations(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.calls().iter().map(AvsCall::evaluation_id).collect();
        ids.dedup();
        ids
    }

    fn respond(&self, call: AvsCall) -> Result<(), AvsApiError> {
        let evaluation_id = call.evaluation_id();
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(&evaluation_id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AvsApi for MockAvsApi {
    async fn remove_reference_from_parent_eval(
        &self,
        parent_id: i64,
        evaluation_id: i64,
    ) -> Result<(), AvsApiError> {
        self.respond(AvsCall::RemoveReference {
            parent_id,
            evaluation_id,
        })
    }

    async fn delete_evaluation(&self, evaluation_id: i64) -> Result<(), AvsApiError> {
        self.respond(AvsCall::Delete { evaluation_id })
    }
}

/// In-memory storage whose next saves can be made to fail like a backend outage
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: InMemoryOperationStorage,
    failing_saves: AtomicUsize,
}

impl FlakyStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl OperationStorage for FlakyStorage {
    async fn insert_operation(
        &self,
        operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation> {
        self.inner.insert_operation(operation).await
    }

    async fn get_operation(&self, operation_id: Uuid) -> StorageResult<DeprovisioningOperation> {
        self.inner.get_operation(operation_id).await
    }

    async fn save_operation(
        &self,
        operation: DeprovisioningOperation,
    ) -> StorageResult<DeprovisioningOperation> {
        let failing = self
            .failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Unavailable("connection refused".to_string()));
        }
        self.inner.save_operation(operation).await
    }
}

pub fn avs_config() -> AvsConfig {
    AvsConfig {
        internal_parent_id: INTERNAL_PARENT_ID,
        external_parent_id: EXTERNAL_PARENT_ID,
    }
}

pub fn unavailable() -> AvsApiError {
    AvsApiError::Unavailable("503 Service Unavailable".to_string())
}

/// Storage, AVS double and a removal step wired with the default retry policy
pub struct RemovalFixture {
    pub storage: Arc<InMemoryOperationStorage>,
    pub avs: Arc<MockAvsApi>,
    pub step: AvsEvaluationRemovalStep,
    pub policy: RetryPolicy,
}

impl RemovalFixture {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        let storage = Arc::new(InMemoryOperationStorage::new());
        let avs = MockAvsApi::new();
        let step = Self::build_step(&storage, &avs, policy);
        Self {
            storage,
            avs,
            step,
            policy,
        }
    }

    /// A fresh step instance over the same storage and AVS, as after a restart
    pub fn restarted_step(&self) -> AvsEvaluationRemovalStep {
        Self::build_step(&self.storage, &self.avs, self.policy)
    }

    /// Driver running a single removal step over the fixture's storage
    pub fn process(&self) -> DeprovisioningProcess {
        let step: Arc<dyn Step> = Arc::new(self.restarted_step());
        DeprovisioningProcess::new(self.storage.clone(), vec![step])
    }

    fn build_step(
        storage: &Arc<InMemoryOperationStorage>,
        avs: &Arc<MockAvsApi>,
        policy: RetryPolicy,
    ) -> AvsEvaluationRemovalStep {
        let delegator = Arc::new(Delegator::new(
            avs.clone(),
            storage.clone(),
            avs_config(),
        ));
        AvsEvaluationRemovalStep::new(delegator, storage.clone(), policy)
    }

    pub async fn insert(&self, lifecycle: AvsLifecycle) -> DeprovisioningOperation {
        self.storage
            .insert_operation(DeprovisioningOperation::new("instance-under-test", lifecycle))
            .await
            .unwrap()
    }
}

pub fn pending_lifecycle() -> AvsLifecycle {
    AvsLifecycle::new(INTERNAL_EVALUATION_ID, EXTERNAL_EVALUATION_ID)
}
