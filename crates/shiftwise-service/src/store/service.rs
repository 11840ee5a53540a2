//! Store creation and lookup.
//!
//! Store creation is the synchronous business operation wrapped by the
//! async work runner; it runs under its own connection, independent of
//! the transaction that admitted the tracking task.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use shiftwise_core::error::AppError;
use shiftwise_core::result::AppResult;
use shiftwise_database::StoreRepository;
use shiftwise_entity::store::Store;

/// Manages stores.
#[derive(Debug)]
pub struct StoreService {
    repo: Arc<dyn StoreRepository>,
}

impl StoreService {
    /// Create a new store service.
    pub fn new(repo: Arc<dyn StoreRepository>) -> Self {
        Self { repo }
    }

    /// Create a store. Fails with Validation on an empty name and
    /// Conflict on a duplicate one.
    pub async fn create_store(
        &self,
        name: &str,
        timezone: &str,
        created_by: i64,
    ) -> AppResult<Store> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Store name must not be empty"));
        }
        if timezone.trim().is_empty() {
            return Err(AppError::validation("Store timezone must not be empty"));
        }

        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4(),
            name: name.to_string(),
            timezone: timezone.trim().to_string(),
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&store).await?;

        info!(store_id = %store.id, name, "Store created");
        Ok(store)
    }

    /// Look up a store by id.
    pub async fn get_store(&self, id: Uuid) -> AppResult<Store> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Store '{id}' not found")))
    }
}
