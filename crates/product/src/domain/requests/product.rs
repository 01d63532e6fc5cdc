use genproto::product::{
    CreateProductRequest as CreateProductRequestProto,
    FindAllProductRequest as FindAllProductRequestProto,
    UpdateProductRequest as UpdateProductRequestProto,
    ValidateProductsRequest as ValidateProductsRequestProto,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_LIMIT: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindAllProducts {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: i32,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    pub limit: i32,
}

fn default_page() -> i32 {
    DEFAULT_PAGE
}

fn default_limit() -> i32 {
    DEFAULT_LIMIT
}

impl Default for FindAllProducts {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FindAllProducts {
    /// Rows to skip before the requested page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).max(0) * i64::from(self.limit)
    }
}

// proto3 has no presence for scalars, so zero means "not sent"
impl From<FindAllProductRequestProto> for FindAllProducts {
    fn from(value: FindAllProductRequestProto) -> Self {
        Self {
            page: if value.page == 0 { DEFAULT_PAGE } else { value.page },
            limit: if value.limit == 0 {
                DEFAULT_LIMIT
            } else {
                value.limit
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(
        custom(function = "finite_price", message = "Price must be a finite number"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: f64,
}

// `range` lets NaN through since every comparison with it is false
fn finite_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

impl From<CreateProductRequestProto> for CreateProductRequest {
    fn from(value: CreateProductRequestProto) -> Self {
        Self {
            name: value.name,
            description: value.description,
            price: value.price,
        }
    }
}

/// Partial update payload. `id` may be present on the wire but is never applied;
/// only [`ProductChanges`] reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub id: Option<i32>,

    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(
        custom(function = "finite_price", message = "Price must be a finite number"),
        range(min = 0.0, message = "Price cannot be negative")
    )]
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn changes(&self) -> ProductChanges {
        ProductChanges {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

impl From<UpdateProductRequestProto> for UpdateProductRequest {
    fn from(value: UpdateProductRequestProto) -> Self {
        Self {
            id: Some(value.id),
            name: value.name,
            description: value.description,
            price: value.price,
        }
    }
}

/// Mutable product attributes. There is no id field, so an update can never
/// re-key a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValidateProductsRequest {
    #[validate(length(min = 1, message = "At least one product id is required"))]
    pub ids: Vec<i32>,
}

impl From<ValidateProductsRequestProto> for ValidateProductsRequest {
    fn from(value: ValidateProductsRequestProto) -> Self {
        Self { ids: value.ids }
    }
}

/// Set semantics: duplicates dropped, input order discarded.
pub fn unique_ids(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}
