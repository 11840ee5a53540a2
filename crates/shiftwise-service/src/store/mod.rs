//! Store management service.

pub mod service;

pub use service::StoreService;
