//! Database connection pool management

mod postgres;

pub use postgres::{create_pool, is_transient_error, DatabaseConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
