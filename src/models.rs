//! Wire representations of stored records.
//!
//! Each type mirrors its entity field for field. References are carried as
//! the referenced id, and credentials never leave the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{categories, products, suppliers, users};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_person: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: Uuid,
    pub supplier: Option<Uuid>,
    pub unit_price: f64,
    pub quantity: i32,
    pub reorder_level: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_staff: model.is_staff,
        }
    }
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<suppliers::Model> for Supplier {
    fn from(model: suppliers::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_person: model.contact_person,
            email: model.email,
        }
    }
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category_id,
            supplier: model.supplier_id,
            unit_price: model.unit_price,
            quantity: model.quantity,
            reorder_level: model.reorder_level,
            created_at: model.created_at.with_timezone(&Utc),
            created_by: model.created_by_id,
            updated_by: model.updated_by_id,
        }
    }
}
