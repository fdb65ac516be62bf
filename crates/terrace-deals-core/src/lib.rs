//! Terrace Deals Core - Deal business logic
//!
//! Everything between the HTTP handlers and the deal repository: the team
//! allowlist gate, ownership scoping with the admin override, input
//! validation, and the status-date lifecycle.

pub mod config;
pub mod error;
pub mod service;

pub use config::DealsConfig;
pub use error::DealError;
pub use service::{DealInput, DealService, DealSummary};
