pub mod manager;
pub mod models;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager, PoolSettings, PoolStatus, TenantBinding, TenantConnection};
