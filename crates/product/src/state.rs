use crate::di::{DependenciesInject, DependenciesInjectDeps};
use prometheus_client::registry::Registry;
use shared::config::{ConnectionManager, ConnectionPool};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Registry>,
    pool: ConnectionPool,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("registry", &self.registry)
            .finish()
    }
}

impl AppState {
    pub fn new(pool: ConnectionPool) -> Self {
        let mut registry = Registry::default();

        let deps = DependenciesInjectDeps { pool: pool.clone() };
        let di_container = DependenciesInject::new(deps, &mut registry);

        Self {
            di_container,
            registry: Arc::new(registry),
            pool,
        }
    }

    pub async fn close(&self) {
        ConnectionManager::close(&self.pool).await;
    }
}
