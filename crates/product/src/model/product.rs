use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    /// Availability filter. Only visible rows are returned by listing, lookup,
    /// update and removal.
    ///
    /// Batch validation deliberately ignores this: a row that exists at all counts,
    /// see `ProductQueryRepositoryTrait::find_existing_by_ids`.
    pub fn is_visible(&self) -> bool {
        self.available
    }
}
