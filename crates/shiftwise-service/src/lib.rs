//! Business logic services for Shiftwise.

pub mod store;
pub mod task;

pub use store::service::StoreService;
pub use task::service::TaskService;
