use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Supplier;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "contact_person must be 1 to 255 characters"
    ))]
    pub contact_person: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "contact_person must be 1 to 255 characters"
    ))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

impl From<CreateSupplierRequest> for UpdateSupplierRequest {
    fn from(full: CreateSupplierRequest) -> Self {
        Self {
            name: Some(full.name),
            contact_person: Some(full.contact_person),
            email: Some(full.email),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SupplierList {
    #[schema(value_type = Vec<Supplier>)]
    pub items: Vec<Supplier>,
}
