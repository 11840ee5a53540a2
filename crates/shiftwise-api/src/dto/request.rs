//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Body for store creation (both the sync and async variants).
///
/// Also serialized verbatim as the task's request snapshot, hence the
/// `Serialize` derive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoreRequest {
    /// Store display name.
    pub name: String,
    /// IANA timezone the store schedules in.
    pub timezone: String,
}
