use crate::model::product::Product as ProductModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

/// Read access to the catalog.
///
/// The `*_visible*` operations apply the availability filter (`available = true`).
/// `find_existing_by_ids` only asks whether a row exists, whatever its availability.
#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn count_visible(&self) -> Result<i64, RepositoryError>;
    async fn find_visible_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ProductModel>, RepositoryError>;
    async fn find_visible_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;
    async fn find_existing_by_ids(&self, ids: &[i32])
    -> Result<Vec<ProductModel>, RepositoryError>;
}
