//! Terrace DB - Database abstractions
//!
//! SQLx-based Postgres layer for the deals store and the team allowlist.
//!
//! # Example
//!
//! ```rust,ignore
//! use terrace_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/terrace").await?;
//! let repos = Repositories::new(pool);
//!
//! let deals = repos.deals.list_for("jane@x.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, ping, DbPool};
pub use repo::*;
