//! Task tracking service.

pub mod service;

pub use service::TaskService;
