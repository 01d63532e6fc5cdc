use crate::{
    abstract_trait::product::repository::{
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait,
    },
    domain::requests::product::{CreateProductRequest, ProductChanges},
    model::product::Product,
};
use async_trait::async_trait;
use chrono::Utc;
use shared::errors::RepositoryError;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Repository double backed by a `Vec`, mirroring the SQL filters.
#[derive(Default)]
pub struct InMemoryProductStore {
    rows: Mutex<Vec<Product>>,
    writes: AtomicUsize,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: i32, name: &str, price: f64, available: bool) {
        let now = Utc::now().naive_utc();
        self.rows.lock().unwrap().push(Product {
            id,
            name: name.to_string(),
            description: None,
            price,
            available,
            created_at: Some(now),
            updated_at: Some(now),
        });
    }

    pub fn seed_available(&self, count: i32) {
        for id in 1..=count {
            self.insert(id, &format!("Product {id}"), f64::from(id), true);
        }
    }

    pub fn get(&self, id: i32) -> Option<Product> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn modify(
        &self,
        id: i32,
        apply: impl FnOnce(&mut Product),
    ) -> Result<Product, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        apply(row);
        row.updated_at = Some(Utc::now().naive_utc());
        Ok(row.clone())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryProductStore {
    async fn count_visible(&self) -> Result<i64, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| p.is_visible()).count() as i64)
    }

    async fn find_visible_page(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut visible: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_visible())
            .cloned()
            .collect();
        visible.sort_by_key(|p| p.id);

        Ok(visible
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_visible_by_id(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.get(id).filter(Product::is_visible))
    }

    async fn find_existing_by_ids(&self, ids: &[i32]) -> Result<Vec<Product>, RepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryProductStore {
    async fn create_product(&self, req: &CreateProductRequest) -> Result<Product, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let now = Utc::now().naive_utc();
        let product = Product {
            id,
            name: req.name.clone(),
            description: req.description.clone(),
            price: req.price,
            available: true,
            created_at: Some(now),
            updated_at: Some(now),
        };
        rows.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        self.modify(id, |row| {
            if let Some(name) = &changes.name {
                row.name = name.clone();
            }
            if let Some(description) = &changes.description {
                row.description = Some(description.clone());
            }
            if let Some(price) = changes.price {
                row.price = price;
            }
        })
    }

    async fn mark_unavailable(&self, id: i32) -> Result<Product, RepositoryError> {
        self.modify(id, |row| row.available = false)
    }
}
