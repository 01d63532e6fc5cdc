use crate::domain::{
    requests::product::FindAllProducts,
    response::{
        api::{ApiResponse, ApiResponsePagination},
        product::ProductResponse,
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllProducts,
    ) -> Result<ApiResponsePagination<Vec<ProductResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError>;
    async fn validate_products(
        &self,
        ids: &[i32],
    ) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError>;
}
