//! Postgres task ledger implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shiftwise_core::error::{AppError, ErrorKind};
use shiftwise_core::result::AppResult;
use shiftwise_core::types::TaskId;
use shiftwise_entity::task::Task;

use super::TaskLedger;

/// Task ledger backed by the `tasks` table.
///
/// Every call acquires its own connection from the shared pool, so ledger
/// writes made by a worker are independent of the transaction that
/// admitted the task.
#[derive(Debug, Clone)]
pub struct PgTaskLedger {
    pool: PgPool,
}

impl PgTaskLedger {
    /// Create a new Postgres task ledger.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskLedger for PgTaskLedger {
    async fn insert(&self, task: &Task) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tasks (id, task_type, requester_id, request_payload, result_payload, \
             error_message, status, progress, started_at, completed_at, expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&task.id)
        .bind(&task.task_type)
        .bind(task.requester_id)
        .bind(&task.request_payload)
        .bind(&task.result_payload)
        .bind(&task.error_message)
        .bind(task.status)
        .bind(task.progress)
        .bind(task.started_at)
        .bind(task.completed_at)
        .bind(task.expires_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert task", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE tasks SET status = $2, progress = $3, result_payload = $4, \
             error_message = $5, completed_at = $6, updated_at = $7 \
             WHERE id = $1",
        )
        .bind(&task.id)
        .bind(task.status)
        .bind(task.progress)
        .bind(&task.result_payload)
        .bind(&task.error_message)
        .bind(task.completed_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Task '{}' not found", task.id)));
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM tasks WHERE status IN ('COMPLETED', 'FAILED') AND expires_at < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete expired tasks", e)
        })?;
        Ok(result.rows_affected())
    }
}
