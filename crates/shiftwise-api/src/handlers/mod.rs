//! HTTP request handlers.

pub mod health;
pub mod store;
pub mod task;
