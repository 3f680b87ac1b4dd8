use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
    pub category: Uuid,
    #[serde(default)]
    pub supplier: Option<Uuid>,
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "reorder_level must not be negative"))]
    pub reorder_level: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: Option<String>,
    pub category: Option<Uuid>,
    /// `null` detaches the supplier; omitting the field leaves it unchanged.
    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub supplier: Option<Option<Uuid>>,
    #[validate(range(min = 0.0, message = "unit_price must not be negative"))]
    pub unit_price: Option<f64>,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "reorder_level must not be negative"))]
    pub reorder_level: Option<i32>,
}

impl From<CreateProductRequest> for UpdateProductRequest {
    fn from(full: CreateProductRequest) -> Self {
        Self {
            name: Some(full.name),
            category: Some(full.category),
            supplier: Some(full.supplier),
            unit_price: Some(full.unit_price),
            quantity: Some(full.quantity),
            reorder_level: Some(full.reorder_level),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
