//! Postgres store repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use shiftwise_core::error::{AppError, ErrorKind};
use shiftwise_core::result::AppResult;
use shiftwise_entity::store::Store;

use super::StoreRepository;

/// Store repository backed by the `stores` table.
#[derive(Debug, Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    /// Create a new Postgres store repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn create(&self, store: &Store) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO stores (id, name, timezone, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(store.id)
        .bind(&store.name)
        .bind(&store.timezone)
        .bind(store.created_by)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::conflict(format!("Store '{}' already exists", store.name))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create store", e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find store", e))
    }
}
