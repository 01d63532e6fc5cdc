use crate::{
    abstract_trait::product::repository::ProductCommandRepositoryTrait,
    domain::requests::product::{CreateProductRequest, ProductChanges},
    model::product::Product as ProductModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create_product(
        &self,
        product: &CreateProductRequest,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            INSERT INTO products (name, description, price, created_at, updated_at)
            VALUES ($1, $2, $3, current_timestamp, current_timestamp)
            RETURNING id, name, description, price, available, created_at, updated_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create product {}: {:?}", product.name, err);
            RepositoryError::from(err)
        })?;

        info!("✅ Created product ID {} ({})", result.id, result.name);
        Ok(result)
    }

    async fn update_product(
        &self,
        id: i32,
        changes: &ProductChanges,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                updated_at = current_timestamp
            WHERE id = $1
            RETURNING id, name, description, price, available, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update product ID {}: {:?}", id, err);
            RepositoryError::from(err)
        })?;

        info!("🔄 Updated product ID {}", result.id);
        Ok(result)
    }

    async fn mark_unavailable(&self, id: i32) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET available = FALSE,
                updated_at = current_timestamp
            WHERE id = $1
            RETURNING id, name, description, price, available, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to mark product ID {} unavailable: {:?}", id, err);
            RepositoryError::from(err)
        })?;

        info!("🗑️ Product ID {} marked unavailable", result.id);
        Ok(result)
    }
}
