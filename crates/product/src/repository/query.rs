use crate::{
    abstract_trait::product::repository::ProductQueryRepositoryTrait,
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn count_visible(&self) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE available = TRUE
            "#,
        )
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to count available products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(total)
    }

    async fn find_visible_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("🔍 Fetching available products | offset: {offset}, limit: {limit}");

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, description, price, available, created_at, updated_at
            FROM products
            WHERE available = TRUE
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }

    async fn find_visible_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🆔 Fetching available product by ID: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, description, price, available, created_at, updated_at
            FROM products
            WHERE id = $1 AND available = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(result)
    }

    async fn find_existing_by_ids(
        &self,
        ids: &[i32],
    ) -> Result<Vec<ProductModel>, RepositoryError> {
        info!("📦 Fetching products by IDs: {:?}", ids);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        // no availability filter: soft-deleted rows still exist
        let products = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, description, price, available, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch products by IDs: {:?}", e);
            RepositoryError::from(e)
        })?;

        Ok(products)
    }
}
