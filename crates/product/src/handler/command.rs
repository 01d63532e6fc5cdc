use crate::{
    abstract_trait::product::service::DynProductCommandService,
    domain::requests::product::{
        CreateProductRequest as DomainCreateProductRequest,
        UpdateProductRequest as DomainUpdateProductRequest,
    },
};
use genproto::product::{
    ApiResponseProduct, CreateProductRequest, FindByIdProductRequest, UpdateProductRequest,
    product_command_service_server::ProductCommandService,
};
use shared::errors::{AppErrorGrpc, ServiceError};
use tonic::{Request, Response, Status};
use tracing::info;
use validator::Validate;

#[derive(Clone)]
pub struct ProductCommandServiceImpl {
    pub command: DynProductCommandService,
}

impl ProductCommandServiceImpl {
    pub fn new(command: DynProductCommandService) -> Self {
        Self { command }
    }
}

#[tonic::async_trait]
impl ProductCommandService for ProductCommandServiceImpl {
    async fn create(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Creating new Product");

        let domain_req = DomainCreateProductRequest::from(request.into_inner());
        domain_req
            .validate()
            .map_err(|e| AppErrorGrpc::from(ServiceError::from(e)))?;

        let api_response = self
            .command
            .create_product(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let id = api_response.data.id;
        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Product created successfully with ID: {id}");
        Ok(Response::new(reply))
    }

    async fn update(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Updating Product");

        let req = request.into_inner();
        let id = req.id;

        let domain_req = DomainUpdateProductRequest::from(req);
        domain_req
            .validate()
            .map_err(|e| AppErrorGrpc::from(ServiceError::from(e)))?;

        let api_response = self
            .command
            .update_product(id, &domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Product updated successfully: ID={id}");
        Ok(Response::new(reply))
    }

    async fn remove(
        &self,
        request: Request<FindByIdProductRequest>,
    ) -> Result<Response<ApiResponseProduct>, Status> {
        info!("Soft deleting Product");

        let req = request.into_inner();

        let api_response = self
            .command
            .remove_product(req.id)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseProduct {
            status: api_response.status,
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Product soft deleted: ID={}", req.id);
        Ok(Response::new(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::{command::ProductCommandService as CommandService, query::ProductQueryService},
        test_support::InMemoryProductStore,
    };
    use prometheus_client::registry::Registry;
    use std::sync::Arc;
    use tonic::Code;

    fn handler(store: Arc<InMemoryProductStore>) -> ProductCommandServiceImpl {
        let mut registry = Registry::default();
        let query = Arc::new(ProductQueryService::new(store.clone(), &mut registry));
        let command = CommandService::new(query, store, &mut registry);
        ProductCommandServiceImpl::new(Arc::new(command))
    }

    #[tokio::test]
    async fn create_returns_available_product() {
        let handler = handler(Arc::new(InMemoryProductStore::new()));

        let reply = handler
            .create(Request::new(CreateProductRequest {
                name: "Chair".into(),
                description: None,
                price: 80.0,
            }))
            .await
            .unwrap()
            .into_inner();

        let data = reply.data.unwrap();
        assert_eq!(data.id, 1);
        assert!(data.available);
        assert_eq!(data.price, 80.0);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let store = Arc::new(InMemoryProductStore::new());
        let handler = handler(store.clone());

        let status = handler
            .create(Request::new(CreateProductRequest {
                name: String::new(),
                description: None,
                price: 1.0,
            }))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn update_targets_request_id() {
        let store = Arc::new(InMemoryProductStore::new());
        store.insert(5, "Sofa", 300.0, true);
        let handler = handler(store.clone());

        let reply = handler
            .update(Request::new(UpdateProductRequest {
                id: 5,
                name: None,
                description: Some("Three seats".into()),
                price: None,
            }))
            .await
            .unwrap()
            .into_inner();

        let data = reply.data.unwrap();
        assert_eq!(data.id, 5);
        assert_eq!(data.name, "Sofa");
        assert_eq!(data.description.as_deref(), Some("Three seats"));
    }

    #[tokio::test]
    async fn remove_twice_reports_not_found() {
        let store = Arc::new(InMemoryProductStore::new());
        store.insert(2, "Shelf", 40.0, true);
        let handler = handler(store);

        let reply = handler
            .remove(Request::new(FindByIdProductRequest { id: 2 }))
            .await
            .unwrap()
            .into_inner();
        assert!(!reply.data.unwrap().available);

        let status = handler
            .remove(Request::new(FindByIdProductRequest { id: 2 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }
}
