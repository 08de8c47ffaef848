//! Persistence layer modules.

pub mod db;
pub mod message_repo;
pub mod pool_repo;
pub mod profile_repo;
pub mod schema;
pub mod shipment_repo;

/// Re-export the database pool type for convenience.
pub use sqlx::SqlitePool;
