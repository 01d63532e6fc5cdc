use anyhow::{Context, Result};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::info;

pub type ConnectionPool = Pool<Postgres>;

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Owns the lifecycle of the process-wide Postgres pool: opened once at start-up,
/// shared by every repository, closed on shutdown.
pub struct ConnectionManager;

impl ConnectionManager {
    pub async fn new_pool(
        connection_string: &str,
        settings: PoolSettings,
    ) -> Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(connection_string)
            .await
            .context("Failed to create database connection pool")?;

        info!(
            "🗄️ Database connected (min: {}, max: {})",
            settings.min_connections, settings.max_connections
        );

        Ok(pool)
    }

    pub async fn close(pool: &ConnectionPool) {
        pool.close().await;
        info!("🗄️ Database pool closed");
    }
}
