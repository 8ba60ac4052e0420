//! Database module providing account storage backends.
//!
//! The ledger only needs a key-value account store with atomic
//! read-modify-write. Two backends implement [`AccountStore`]:
//! - [`PgAccountStore`]: PostgreSQL via a sqlx connection pool
//! - [`MemoryAccountStore`]: in-process map, used for tests and demos

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub mod config;
pub mod memory;
pub mod repository;

pub use config::DatabaseConfig;
pub use memory::MemoryAccountStore;
pub use repository::{AccountStore, PgAccountStore};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use credit_casino::db::{Database, DatabaseConfig, PgAccountStore};
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = DatabaseConfig::from_env();
    ///     let db = Database::new(&config).await?;
    ///     let store = PgAccountStore::new(Arc::new(db.pool().clone()));
    ///     store.ensure_schema().await?;
    ///     db.close().await;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for in-flight queries, then close every pooled connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}
