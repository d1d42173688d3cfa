//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`:
//! the blog post repository and the image store.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver, in-memory repository only
//! - `postgres` - PostgreSQL repository via SeaORM

pub mod database;
pub mod images;

// Re-exports - always available
pub use database::{DatabaseConfig, InMemoryPostRepository};
pub use images::LocalImageStore;

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;
