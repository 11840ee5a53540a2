//! Store entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A store (a physical location whose shifts are scheduled).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Store {
    /// Unique store identifier.
    pub id: Uuid,
    /// Display name, unique per account.
    pub name: String,
    /// IANA timezone the store schedules in.
    pub timezone: String,
    /// Account that created the store.
    pub created_by: i64,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}
