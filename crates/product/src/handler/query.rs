use crate::{
    abstract_trait::product::service::DynProductQueryService,
    domain::requests::product::{FindAllProducts, ValidateProductsRequest as DomainValidateRequest},
};
use genproto::product::{
    ApiResponsePaginationProduct, ApiResponseProduct, ApiResponseProducts, FindAllProductRequest,
    FindByIdProductRequest, ValidateProductsRequest,
    product_query_service_server::ProductQueryService,
};
use shared::errors::{AppErrorGrpc, ServiceError};
use tonic::{Request, Response, Status};
use tracing::info;
use validator::Validate;

#[derive(Clone)]
pub struct ProductQueryServiceImpl {
    pub query: DynProductQueryService,
}

impl ProductQueryServiceImpl {
    pub fn new(query: DynProductQueryService) -> Self {
        Self { query }
    }
}

#[tonic::async_trait]
impl ProductQueryService for ProductQueryServiceImpl {
    async fn find_all(
        &self,
        request: Request<FindAllProductRequest>,
    ) -> Result<Response<ApiResponsePaginationProduct>, Status> {
        info!("Handling gRPC request: Find all Products");

        let domain_req = FindAllProducts::from(request.into_inner());
        domain_req
            .validate()
            .map_err(|e| AppErrorGrpc::from(ServiceError::from(e)))?;

        let api_response = self
            .query
            .find_all(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let data: Vec<genproto::product::ProductResponse> =
            api_response.data.into_iter().map(Into::into).collect();

        let len = data.len();

        let reply = ApiResponsePaginationProduct {
            status: api_response.status,
            message: api_response.message,
            data,
            meta: Some(api_response.meta.into()),
        };

        info!("Successfully fetched {} Products", len);
        Ok(Response::new(reply))
    }

    async fn find_by_id(
        &self,
        request: Request<FindByIdProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Handling gRPC request: Find Product by ID");

        let req = request.into_inner();

        let api_response = self
            .query
            .find_by_id(req.id)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Successfully fetched Product with ID: {}", req.id);
        Ok(Response::new(reply))
    }

    async fn validate_products(
        &self,
        request: Request<ValidateProductsRequest>,
    ) -> Result<Response<ApiResponseProducts>, Status> {
        info!("Handling gRPC request: Validate Products");

        let domain_req = DomainValidateRequest::from(request.into_inner());
        domain_req
            .validate()
            .map_err(|e| AppErrorGrpc::from(ServiceError::from(e)))?;

        let api_response = self
            .query
            .validate_products(&domain_req.ids)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProducts {
            status: api_response.status,
            message: api_response.message,
            data: api_response.data.into_iter().map(Into::into).collect(),
        };

        info!("Validated {} Products", reply.data.len());
        Ok(Response::new(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::query::ProductQueryService as QueryService, test_support::InMemoryProductStore,
    };
    use prometheus_client::registry::Registry;
    use std::sync::Arc;
    use tonic::Code;

    fn handler(store: Arc<InMemoryProductStore>) -> ProductQueryServiceImpl {
        let mut registry = Registry::default();
        ProductQueryServiceImpl::new(Arc::new(QueryService::new(store, &mut registry)))
    }

    #[tokio::test]
    async fn find_all_uses_defaults_for_unset_fields() {
        let store = Arc::new(InMemoryProductStore::new());
        store.seed_available(12);
        let handler = handler(store);

        let reply = handler
            .find_all(Request::new(FindAllProductRequest { page: 0, limit: 0 }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(reply.status, "success");
        assert_eq!(reply.data.len(), 10);
        let meta = reply.meta.unwrap();
        assert_eq!((meta.total, meta.current_page, meta.last_page), (12, 1, 2));
    }

    #[tokio::test]
    async fn find_all_rejects_negative_limit() {
        let handler = handler(Arc::new(InMemoryProductStore::new()));

        let status = handler
            .find_all(Request::new(FindAllProductRequest { page: 1, limit: -5 }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn find_by_id_of_removed_product_is_not_found() {
        let store = Arc::new(InMemoryProductStore::new());
        store.insert(3, "Gone", 1.0, false);
        let handler = handler(store);

        let status = handler
            .find_by_id(Request::new(FindByIdProductRequest { id: 3 }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "Product with id: #3 not found");
    }

    #[tokio::test]
    async fn validate_products_maps_missing_ids_to_not_found() {
        let store = Arc::new(InMemoryProductStore::new());
        store.seed_available(1);
        let handler = handler(store);

        let status = handler
            .validate_products(Request::new(ValidateProductsRequest { ids: vec![1, 2] }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn validate_products_rejects_empty_list() {
        let handler = handler(Arc::new(InMemoryProductStore::new()));

        let status = handler
            .validate_products(Request::new(ValidateProductsRequest { ids: vec![] }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
    }
}
