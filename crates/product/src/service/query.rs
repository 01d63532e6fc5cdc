use crate::{
    abstract_trait::product::{
        repository::DynProductQueryRepository, service::ProductQueryServiceTrait,
    },
    domain::{
        requests::product::{FindAllProducts, unique_ids},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            pagination::PaginationMeta,
            product::ProductResponse,
        },
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use tracing::info;

#[derive(Clone)]
pub struct ProductQueryService {
    pub query: DynProductQueryRepository,
    tracer: OperationTracer,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "product_query_service", "ProductQueryService");

        Self {
            query,
            tracer: OperationTracer::new("product-query-service", metrics),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        self.tracer.metrics()
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError> {
        info!(
            "🔍 Finding all products | Page: {}, Limit: {}",
            req.page, req.limit
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("page", i64::from(req.page)),
                KeyValue::new("limit", i64::from(req.limit)),
            ],
        );

        let total = match self.query.count_visible().await {
            Ok(total) => total,
            Err(e) => {
                let msg = format!("Failed to count products: {e:?}");
                self.tracer.failure(&tracing_ctx, method, &msg, false);
                return Err(ServiceError::Repo(e));
            }
        };

        let meta = PaginationMeta::new(total, req.page, req.limit);

        let products = match self
            .query
            .find_visible_page(req.offset(), i64::from(req.limit))
            .await
        {
            Ok(products) => products,
            Err(e) => {
                let msg = format!("Failed to fetch products: {e:?}");
                self.tracer.failure(&tracing_ctx, method, &msg, false);
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

        info!(
            "✅ Found {} products (total: {}, last page: {})",
            data.len(),
            meta.total,
            meta.last_page
        );
        self.tracer
            .success(&tracing_ctx, method, "Products retrieved from DB");

        Ok(ApiResponsePagination::success(
            "Products retrieved successfully",
            data,
            meta,
        ))
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        info!("🆔 Finding product by ID: {id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_by_id",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.id", i64::from(id)),
            ],
        );

        let product = match self.query.find_visible_by_id(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                let err = ServiceError::NotFound {
                    entity: "Product",
                    id,
                };
                self.tracer
                    .failure(&tracing_ctx, method, &err.to_string(), true);
                return Err(err);
            }
            Err(e) => {
                let msg = format!("Database error while finding product ID {id}: {e:?}");
                self.tracer.failure(&tracing_ctx, method, &msg, false);
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Found product: '{}' (ID: {id})", product.name);
        self.tracer
            .success(&tracing_ctx, method, "Product retrieved from DB");

        Ok(ApiResponse::success(
            "Product retrieved successfully",
            ProductResponse::from(product),
        ))
    }

    async fn validate_products(
        &self,
        ids: &[i32],
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let ids = unique_ids(ids);
        info!("📦 Validating {} distinct product IDs", ids.len());

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "validate_products",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("product.count", ids.len() as i64),
            ],
        );

        let products = match self.query.find_existing_by_ids(&ids).await {
            Ok(products) => products,
            Err(e) => {
                let msg = format!("Failed to fetch products for validation: {e:?}");
                self.tracer.failure(&tracing_ctx, method, &msg, false);
                return Err(ServiceError::Repo(e));
            }
        };

        if products.len() != ids.len() {
            let err = ServiceError::BatchNotFound { entity: "products" };
            let msg = format!(
                "{err} ({} of {} requested)",
                products.len(),
                ids.len()
            );
            self.tracer.failure(&tracing_ctx, method, &msg, true);
            return Err(err);
        }

        self.tracer
            .success(&tracing_ctx, method, "All requested products exist");

        Ok(ApiResponse::success(
            "Products validated successfully",
            products.into_iter().map(ProductResponse::from).collect(),
        ))
    }
}
