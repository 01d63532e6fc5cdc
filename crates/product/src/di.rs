use crate::{
    abstract_trait::product::{
        repository::{DynProductCommandRepository, DynProductQueryRepository},
        service::{DynProductCommandService, DynProductQueryService},
    },
    repository::{command::ProductCommandRepository, query::ProductQueryRepository},
    service::{command::ProductCommandService, query::ProductQueryService},
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps { pool } = deps;

        let product_query_repo =
            Arc::new(ProductQueryRepository::new(pool.clone())) as DynProductQueryRepository;
        let product_command_repo =
            Arc::new(ProductCommandRepository::new(pool)) as DynProductCommandRepository;

        Self::from_repositories(product_query_repo, product_command_repo, registry)
    }

    /// Wires the services over any repository implementation.
    pub fn from_repositories(
        query_repo: DynProductQueryRepository,
        command_repo: DynProductCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let product_query =
            Arc::new(ProductQueryService::new(query_repo, registry)) as DynProductQueryService;

        let product_command = Arc::new(ProductCommandService::new(
            product_query.clone(),
            command_repo,
            registry,
        )) as DynProductCommandService;

        Self {
            product_query,
            product_command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::requests::product::CreateProductRequest, test_support::InMemoryProductStore,
    };
    use prometheus_client::encoding::text::encode;

    #[tokio::test]
    async fn wired_services_share_one_store() {
        let mut registry = Registry::default();
        let store = Arc::new(InMemoryProductStore::new());
        let di = DependenciesInject::from_repositories(store.clone(), store, &mut registry);

        let created = di
            .product_command
            .create_product(&CreateProductRequest {
                name: "Bottle".into(),
                description: None,
                price: 4.5,
            })
            .await
            .unwrap();
        let found = di.product_query.find_by_id(created.data.id).await.unwrap();
        assert_eq!(found.data.name, "Bottle");

        let mut buffer = String::new();
        encode(&mut buffer, &registry).unwrap();
        assert!(buffer.contains("product_query_service_request_counter"));
        assert!(buffer.contains("product_command_service_request_counter"));
    }
}
