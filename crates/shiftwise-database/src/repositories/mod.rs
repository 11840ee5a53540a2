//! Repository traits and implementations.

pub mod memory;
pub mod store;
pub mod task;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shiftwise_core::result::AppResult;
use shiftwise_core::types::TaskId;
use shiftwise_entity::store::Store;
use shiftwise_entity::task::Task;

/// Durable storage for task records.
///
/// Pure CRUD plus a predicate-based bulk delete. No row locking or
/// versioning is applied; concurrent writers race with last-write-wins.
#[async_trait]
pub trait TaskLedger: Send + Sync + std::fmt::Debug {
    /// Insert a new task record.
    async fn insert(&self, task: &Task) -> AppResult<()>;

    /// Find a task by id.
    async fn find_by_id(&self, id: &TaskId) -> AppResult<Option<Task>>;

    /// Overwrite an existing task record. NotFound if the row is gone.
    async fn update(&self, task: &Task) -> AppResult<()>;

    /// Bulk-delete rows with status COMPLETED or FAILED whose retention
    /// window ended before `now`. Returns the number of rows removed.
    /// IN_PROGRESS and CANCELLED rows are never touched.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Durable storage for store records.
#[async_trait]
pub trait StoreRepository: Send + Sync + std::fmt::Debug {
    /// Insert a new store. Conflict if the name is already taken.
    async fn create(&self, store: &Store) -> AppResult<()>;

    /// Find a store by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;
}
