use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::User;

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

/// Outcome of a user deletion, including the products removed with it.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedUser {
    pub id: Uuid,
    pub deleted_products: u64,
}
