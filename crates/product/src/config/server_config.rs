use crate::config::myconfig::Config;
use anyhow::{Context, Result};
use shared::config::PoolSettings;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub grpc_addr: SocketAddr,
    pub metrics_addr: SocketAddr,
    pub database_url: String,
    pub pool: PoolSettings,
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            grpc_addr: format!("0.0.0.0:{}", config.product.grpc_port)
                .parse()
                .context("Invalid gRPC address")?,
            metrics_addr: format!("0.0.0.0:{}", config.product.metric_port)
                .parse()
                .context("Invalid metrics address")?,
            database_url: config.database_url.clone(),
            pool: PoolSettings {
                min_connections: config.db_min_conn,
                max_connections: config.db_max_conn,
                ..PoolSettings::default()
            },
            run_migrations: config.run_migrations,
        })
    }
}
