use crate::{
    abstract_trait::product::{
        repository::DynProductCommandRepository,
        service::{DynProductQueryService, ProductCommandServiceTrait},
    },
    domain::{
        requests::product::{CreateProductRequest, UpdateProductRequest},
        response::{api::ApiResponse, product::ProductResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, Metrics, OperationTracer, TracingContext},
};
use tracing::info;

/// Writes to the catalog. Update and remove first go through the query service's
/// `find_by_id`, so they see exactly the same existence rule as a plain lookup.
///
/// The check and the write are separate round-trips; a concurrent remove between
/// them is not guarded against.
#[derive(Clone)]
pub struct ProductCommandService {
    pub query: DynProductQueryService,
    pub command: DynProductCommandRepository,
    tracer: OperationTracer,
}

impl ProductCommandService {
    pub fn new(
        query: DynProductQueryService,
        command: DynProductCommandRepository,
        registry: &mut Registry,
    ) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_command_service", "ProductCommandService");

        Self {
            query,
            command,
            tracer: OperationTracer::new("product-command-service", metrics),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        self.tracer.metrics()
    }

    async fn ensure_visible(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        id: i32,
    ) -> Result<(), ServiceError> {
        if let Err(err) = self.query.find_by_id(id).await {
            self.tracer.failure(
                tracing_ctx,
                method,
                &err.to_string(),
                err.is_client_error(),
            );
            return Err(err);
        }
        Ok(())
    }

    fn write_failed(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        id: i32,
        err: RepositoryError,
    ) -> ServiceError {
        // the row vanished between the existence check and the write
        let err = match err {
            RepositoryError::NotFound => ServiceError::NotFound {
                entity: "Product",
                id,
            },
            other => ServiceError::Repo(other),
        };
        self.tracer.failure(
            tracing_ctx,
            method,
            &err.to_string(),
            err.is_client_error(),
        );
        err
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create_product(
        &self,
        req: &CreateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🏗️ Creating new product: {}", req.name);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.name", req.name.clone()),
            ],
        );

        let product = match self.command.create_product(req).await {
            Ok(product) => product,
            Err(err) => {
                let msg = format!("Failed to create product: {err:?}");
                self.tracer.failure(&tracing_ctx, method, &msg, false);
                return Err(ServiceError::Repo(err));
            }
        };

        let response = ProductResponse::from(product);

        info!(
            "✅ Product created: {} (ID: {})",
            response.name, response.id
        );
        self.tracer
            .success(&tracing_ctx, method, "Product created successfully");

        Ok(ApiResponse::success(
            "Product created successfully",
            response,
        ))
    }

    async fn update_product(
        &self,
        id: i32,
        req: &UpdateProductRequest,
    ) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🔄 Updating product ID: {id}");

        let method = Method::Put;
        let tracing_ctx = self.tracer.start(
            "update_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", i64::from(id)),
            ],
        );

        self.ensure_visible(&tracing_ctx, method, id).await?;

        let changes = req.changes();

        let product = match self.command.update_product(id, &changes).await {
            Ok(product) => product,
            Err(err) => return Err(self.write_failed(&tracing_ctx, method, id, err)),
        };

        let response = ProductResponse::from(product);

        info!("✅ Product updated: {} (ID: {id})", response.name);
        self.tracer
            .success(&tracing_ctx, method, "Product updated successfully");

        Ok(ApiResponse::success(
            "Product updated successfully",
            response,
        ))
    }

    async fn remove_product(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🗑️ Removing product ID: {id}");

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start(
            "remove_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", i64::from(id)),
            ],
        );

        self.ensure_visible(&tracing_ctx, method, id).await?;

        let product = match self.command.mark_unavailable(id).await {
            Ok(product) => product,
            Err(err) => return Err(self.write_failed(&tracing_ctx, method, id, err)),
        };

        info!("✅ Product ID {id} is no longer available");
        self.tracer
            .success(&tracing_ctx, method, "Product removed successfully");

        Ok(ApiResponse::success(
            "Product removed successfully",
            ProductResponse::from(product),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::product::service::ProductQueryServiceTrait,
        service::query::ProductQueryService, test_support::InMemoryProductStore,
    };
    use shared::utils::Status;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<InMemoryProductStore>,
        query: Arc<ProductQueryService>,
        command: ProductCommandService,
    }

    fn fixture() -> Fixture {
        let mut registry = Registry::default();
        let store = Arc::new(InMemoryProductStore::new());
        let query = Arc::new(ProductQueryService::new(store.clone(), &mut registry));
        let command = ProductCommandService::new(query.clone(), store.clone(), &mut registry);

        Fixture {
            store,
            query,
            command,
        }
    }

    fn assert_not_found(err: ServiceError, expected_id: i32) {
        match err {
            ServiceError::NotFound { id, .. } => assert_eq!(id, expected_id),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_defaults_to_available() {
        let fx = fixture();

        let created = fx
            .command
            .create_product(&CreateProductRequest {
                name: "Keyboard".into(),
                description: Some("Mechanical".into()),
                price: 49.9,
            })
            .await
            .unwrap();

        assert_eq!(created.status, "success");
        assert_eq!(created.data.id, 1);
        assert!(created.data.available);
        assert_eq!(created.data.description.as_deref(), Some("Mechanical"));

        let found = fx.query.find_by_id(created.data.id).await.unwrap();
        assert_eq!(found.data, created.data);
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let fx = fixture();
        fx.store.insert(3, "Mouse", 10.0, true);

        let updated = fx
            .command
            .update_product(
                3,
                &UpdateProductRequest {
                    price: Some(12.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.data.id, 3);
        assert_eq!(updated.data.name, "Mouse");
        assert_eq!(updated.data.price, 12.0);
    }

    #[tokio::test]
    async fn update_ignores_payload_id() {
        let fx = fixture();
        fx.store.insert(1, "Mouse", 10.0, true);
        fx.store.insert(2, "Pad", 5.0, true);

        let updated = fx
            .command
            .update_product(
                1,
                &UpdateProductRequest {
                    id: Some(2),
                    name: Some("Wireless Mouse".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.data.id, 1);
        assert_eq!(fx.store.get(1).unwrap().name, "Wireless Mouse");
        assert_eq!(fx.store.get(2).unwrap().name, "Pad");
    }

    #[tokio::test]
    async fn update_of_unavailable_product_fails_without_writing() {
        let fx = fixture();
        fx.store.insert(99, "Old", 1.0, false);

        let err = fx
            .command
            .update_product(
                99,
                &UpdateProductRequest {
                    name: Some("New".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_not_found(err, 99);
        assert_eq!(fx.store.writes(), 0);
        assert_eq!(fx.store.get(99).unwrap().name, "Old");
    }

    #[tokio::test]
    async fn update_of_missing_product_fails_not_found() {
        let fx = fixture();

        let err = fx
            .command
            .update_product(5, &UpdateProductRequest::default())
            .await
            .unwrap_err();

        assert_not_found(err, 5);
        assert_eq!(fx.store.writes(), 0);
    }

    #[tokio::test]
    async fn remove_flips_availability_and_keeps_other_fields() {
        let fx = fixture();
        fx.store.insert(4, "Lamp", 30.0, true);

        let removed = fx.command.remove_product(4).await.unwrap();

        assert!(!removed.data.available);
        assert_eq!(removed.data.name, "Lamp");
        assert_eq!(removed.data.price, 30.0);

        let row = fx.store.get(4).unwrap();
        assert!(!row.available);
        assert_eq!(row.name, "Lamp");
    }

    #[tokio::test]
    async fn remove_twice_fails_the_second_time() {
        let fx = fixture();
        fx.store.insert(8, "Desk", 100.0, true);

        fx.command.remove_product(8).await.unwrap();
        let err = fx.command.remove_product(8).await.unwrap_err();

        assert_not_found(err, 8);
        assert_eq!(fx.store.writes(), 1);
    }

    #[tokio::test]
    async fn remove_only_touches_the_given_row() {
        let fx = fixture();
        fx.store.seed_available(3);

        fx.command.remove_product(2).await.unwrap();

        assert!(fx.store.get(1).unwrap().available);
        assert!(!fx.store.get(2).unwrap().available);
        assert!(fx.store.get(3).unwrap().available);
    }

    #[tokio::test]
    async fn soft_delete_lifecycle() {
        let fx = fixture();
        fx.store.insert(7, "Cable", 10.0, true);

        let found = fx.query.find_by_id(7).await.unwrap();
        assert!(found.data.available);
        assert_eq!(found.data.price, 10.0);

        let removed = fx.command.remove_product(7).await.unwrap();
        assert_eq!(removed.data.id, 7);
        assert!(!removed.data.available);

        let err = fx.query.find_by_id(7).await.unwrap_err();
        assert_not_found(err, 7);

        let validated = fx.query.validate_products(&[7]).await.unwrap();
        assert_eq!(validated.data.len(), 1);
        assert!(!validated.data[0].available);
    }

    #[tokio::test]
    async fn outcomes_are_recorded_per_operation() {
        let fx = fixture();
        fx.store.insert(1, "Cup", 2.0, true);

        fx.command.remove_product(1).await.unwrap();
        fx.command.remove_product(1).await.unwrap_err();

        let metrics = fx.command.metrics();
        assert_eq!(
            metrics.count(Method::Delete, "remove_product", Status::Success),
            1
        );
        assert_eq!(
            metrics.count(Method::Delete, "remove_product", Status::Error),
            1
        );
    }
}
