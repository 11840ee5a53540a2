//! Database layer for Shiftwise: connection pool management, migrations,
//! and repository implementations.
//!
//! The task ledger is defined as a trait so that services and the sweep can
//! be exercised against either Postgres or the in-memory double.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{StoreRepository, TaskLedger};
