//! Database access layer
//!
//! One [`DatabaseConnection`] pool is opened at startup and shared by every
//! request through [`DatabaseManager`]. DAOs are cheap handles over that pool.

use crate::health::{HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use config::DatabaseConfig;
pub use dao::{CategoryCountRow, PriceBucketRow, SoldCounts, TransactionsDao};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<sea_orm::DbErr> for DatabaseError {
    fn from(err: sea_orm::DbErr) -> Self {
        DatabaseError::Database(err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Apply all pending migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Get transactions DAO
    fn transactions(&self) -> TransactionsDao;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
}

impl DatabaseManagerImpl {
    pub async fn new_from_config(config: &DatabaseConfig) -> DatabaseResult<Self> {
        if let Some(dir) = config.sqlite_parent_dir() {
            tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                DatabaseError::Database(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let mut options = ConnectOptions::new(config.url.clone());
        options.sqlx_logging(false);

        if config.is_in_memory() {
            // Every pooled connection would otherwise see its own empty database
            options.max_connections(1).min_connections(1);
        } else {
            options.max_connections(config.max_connections);
        }

        let connection = sea_orm::Database::connect(options).await?;
        tracing::debug!(url = %config.url, "Database connection established");

        Ok(Self { connection })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use migration::{Migrator, MigratorTrait};

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    fn transactions(&self) -> TransactionsDao {
        TransactionsDao::new(self.connection.clone())
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthCheckResult {
        match self.health_check().await {
            Ok(_) => HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}
