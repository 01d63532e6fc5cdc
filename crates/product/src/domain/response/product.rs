use crate::model::product::Product as ProductModel;
use genproto::product::ProductResponse as ProductResponseProto;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

// model to response
impl From<ProductModel> for ProductResponse {
    fn from(value: ProductModel) -> Self {
        ProductResponse {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            available: value.available,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

// response to proto
impl From<ProductResponse> for ProductResponseProto {
    fn from(value: ProductResponse) -> Self {
        ProductResponseProto {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            available: value.available,
            created_at: value.created_at.unwrap_or_default(),
            updated_at: value.updated_at.unwrap_or_default(),
        }
    }
}
