//! In-memory repository implementations.
//!
//! Used by unit and router tests so the task lifecycle can be exercised
//! without a running Postgres. Semantics mirror the Postgres versions,
//! including the absence of any row versioning.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use shiftwise_core::error::AppError;
use shiftwise_core::result::AppResult;
use shiftwise_core::types::TaskId;
use shiftwise_entity::store::Store;
use shiftwise_entity::task::{Task, TaskStatus};

use super::{StoreRepository, TaskLedger};

/// In-memory task ledger.
#[derive(Debug, Default)]
pub struct MemoryTaskLedger {
    rows: RwLock<HashMap<TaskId, Task>>,
}

impl MemoryTaskLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the ledger holds no records.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl TaskLedger for MemoryTaskLedger {
    async fn insert(&self, task: &Task) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&task.id) {
            return Err(AppError::conflict(format!(
                "Task '{}' already exists",
                task.id
            )));
        }
        rows.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> AppResult<Option<Task>> {
        Ok(self.rows.read().await.get(id).cloned())
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&task.id) {
            return Err(AppError::not_found(format!("Task '{}' not found", task.id)));
        }
        rows.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, task| {
            !(matches!(task.status, TaskStatus::Completed | TaskStatus::Failed)
                && task.expires_at < now)
        });
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory store repository.
#[derive(Debug, Default)]
pub struct MemoryStoreRepository {
    rows: RwLock<HashMap<Uuid, Store>>,
}

impl MemoryStoreRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for MemoryStoreRepository {
    async fn create(&self, store: &Store) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        if rows.values().any(|s| s.name == store.name) {
            return Err(AppError::conflict(format!(
                "Store '{}' already exists",
                store.name
            )));
        }
        rows.insert(store.id, store.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }
}
