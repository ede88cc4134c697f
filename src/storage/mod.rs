//! Database pool, schema bootstrap and generic row repo

pub mod db;
pub mod migrations;
pub mod repo;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use repo::Table;
